//! Multi-value editors: an ordered list of text entries (CSV) and an
//! ordered list of key/value pairs (query string). Both keep exactly one
//! empty slot at the end for the next entry and debounce change
//! propagation so that typing does not emit a value per keystroke.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::{Duration, Instant};

/// Values of fields named `{prefix}{index}`, keyed by index.
fn indexed(fields: &HashMap<String, String>, prefix: &str) -> BTreeMap<usize, String> {
    fields
        .iter()
        .filter_map(|(k, v)| Some((k.strip_prefix(prefix)?.parse().ok()?, v.clone())))
        .collect()
}

/// Deadline-based debounce. `arm` pushes the deadline out; `fire` reports
/// once when it has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Emits a value only when it differs from the last one emitted.
#[derive(Debug, Clone)]
struct Propagation {
    debounce: Debouncer,
    last_emitted: String,
}

impl Propagation {
    fn new(delay: Duration, initial: String) -> Self {
        Self {
            debounce: Debouncer::new(delay),
            last_emitted: initial,
        }
    }

    fn emit(&mut self, value: String) -> Option<String> {
        if value == self.last_emitted {
            return None;
        }
        self.last_emitted = value.clone();
        Some(value)
    }
}

#[derive(Debug, Clone)]
pub struct CsvEditor {
    pub name: String,
    entries: Vec<String>,
    propagation: Propagation,
}

impl CsvEditor {
    pub fn new(name: &str, elements: &str, delay: Duration) -> Self {
        let entries = if elements.is_empty() {
            Vec::new()
        } else {
            elements.split(',').map(str::to_string).collect()
        };
        Self::from_entries(name, entries, delay)
    }

    pub fn from_entries<I: IntoIterator<Item = String>>(name: &str, entries: I, delay: Duration) -> Self {
        let mut editor = Self {
            name: name.to_string(),
            entries: entries.into_iter().collect(),
            propagation: Propagation::new(delay, String::new()),
        };
        editor.normalize();
        editor.propagation.last_emitted = editor.value();
        editor
    }

    /// Rebuilds the editor from posted form fields: the entries sent as
    /// `{name}-{index}`, or the committed `{name}` value when there are
    /// none. The committed value is the baseline for `flush`.
    pub fn from_form(name: &str, fields: &HashMap<String, String>, delay: Duration) -> Self {
        let committed = fields.get(name).map(String::as_str).unwrap_or("");
        let entries = indexed(fields, &format!("{}-", name));
        let editor = if entries.is_empty() {
            Self::new(name, committed, delay)
        } else {
            Self::from_entries(name, entries.into_values(), delay)
        };
        editor.committed(committed)
    }

    /// Sets the value last propagated to the owner, so that `flush` only
    /// reports edits made after it.
    pub fn committed(mut self, value: &str) -> Self {
        self.propagation.last_emitted = value.to_string();
        self
    }

    pub fn committed_value(&self) -> &str {
        &self.propagation.last_emitted
    }

    /// Non-blank entries as `{name}-{index}` fields, for carrying the
    /// editor through pages that do not show it.
    pub fn entry_fields(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|e| !e.trim().is_empty())
            .enumerate()
            .map(|(i, e)| (self.field_name(i), e.clone()))
            .collect()
    }

    fn normalize(&mut self) {
        while self.entries.last().is_some_and(|e| e.trim().is_empty()) {
            self.entries.pop();
        }
        self.entries.push(String::new());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Input name for the entry at `index`.
    pub fn field_name(&self, index: usize) -> String {
        format!("{}-{}", self.name, index)
    }

    /// Updates one entry. Returns false when `index` is out of range.
    pub fn set(&mut self, index: usize, value: &str, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        *entry = value.to_string();
        self.normalize();
        self.propagation.debounce.arm(now);
        true
    }

    pub fn remove(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        self.normalize();
        self.propagation.debounce.arm(now);
        true
    }

    /// Non-empty entries, trimmed.
    pub fn values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn value(&self) -> String {
        self.values().join(",")
    }

    /// Emits the value once the debounce delay has passed since the last edit.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if !self.propagation.debounce.fire(now) {
            return None;
        }
        let value = self.value();
        self.propagation.emit(value)
    }

    /// Emits any pending change immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.propagation.debounce.cancel();
        let value = self.value();
        self.propagation.emit(value)
    }

    pub fn is_pending(&self) -> bool {
        self.propagation.debounce.is_pending()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    fn is_blank(&self) -> bool {
        self.key.trim().is_empty() && self.value.trim().is_empty()
    }

    fn is_complete(&self) -> bool {
        !self.key.trim().is_empty() && !self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct KeyValueEditor {
    pub name: String,
    pairs: Vec<KeyValuePair>,
    propagation: Propagation,
}

impl KeyValueEditor {
    /// Parses `k1=v1&k2=v2`; segments without exactly one `=` are skipped.
    pub fn new(name: &str, elements: &str, delay: Duration) -> Self {
        let pairs = elements.split('&').filter_map(|segment| {
            let mut parts = segment.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(v), None) => Some(KeyValuePair {
                    key: k.to_string(),
                    value: v.to_string(),
                }),
                _ => None,
            }
        });
        Self::from_pairs(name, pairs.collect::<Vec<_>>(), delay)
    }

    pub fn from_pairs<I: IntoIterator<Item = KeyValuePair>>(name: &str, pairs: I, delay: Duration) -> Self {
        let mut editor = Self {
            name: name.to_string(),
            pairs: pairs.into_iter().collect(),
            propagation: Propagation::new(delay, String::new()),
        };
        editor.normalize();
        editor.propagation.last_emitted = editor.value();
        editor
    }

    pub fn from_form(name: &str, fields: &HashMap<String, String>, delay: Duration) -> Self {
        let committed = fields.get(name).map(String::as_str).unwrap_or("");
        let keys = indexed(fields, &format!("{}-key-", name));
        let values = indexed(fields, &format!("{}-value-", name));
        let editor = if keys.is_empty() && values.is_empty() {
            Self::new(name, committed, delay)
        } else {
            let indexes: BTreeSet<usize> = keys.keys().chain(values.keys()).copied().collect();
            let pairs = indexes.into_iter().map(|i| KeyValuePair {
                key: keys.get(&i).cloned().unwrap_or_default(),
                value: values.get(&i).cloned().unwrap_or_default(),
            });
            Self::from_pairs(name, pairs.collect::<Vec<_>>(), delay)
        };
        editor.committed(committed)
    }

    pub fn committed(mut self, value: &str) -> Self {
        self.propagation.last_emitted = value.to_string();
        self
    }

    pub fn committed_value(&self) -> &str {
        &self.propagation.last_emitted
    }

    /// Non-blank pairs as `{name}-key-{index}` / `{name}-value-{index}`
    /// fields. Incomplete pairs are kept so half-typed input survives.
    pub fn entry_fields(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|p| !p.is_blank())
            .enumerate()
            .flat_map(|(i, p)| {
                [
                    (self.key_field_name(i), p.key.clone()),
                    (self.value_field_name(i), p.value.clone()),
                ]
            })
            .collect()
    }

    fn normalize(&mut self) {
        while self.pairs.last().is_some_and(KeyValuePair::is_blank) {
            self.pairs.pop();
        }
        self.pairs.push(KeyValuePair::default());
    }

    pub fn pairs(&self) -> &[KeyValuePair] {
        &self.pairs
    }

    pub fn key_field_name(&self, index: usize) -> String {
        format!("{}-key-{}", self.name, index)
    }

    pub fn value_field_name(&self, index: usize) -> String {
        format!("{}-value-{}", self.name, index)
    }

    pub fn set_key(&mut self, index: usize, key: &str, now: Instant) -> bool {
        let Some(pair) = self.pairs.get_mut(index) else {
            return false;
        };
        pair.key = key.to_string();
        self.normalize();
        self.propagation.debounce.arm(now);
        true
    }

    pub fn set_value(&mut self, index: usize, value: &str, now: Instant) -> bool {
        let Some(pair) = self.pairs.get_mut(index) else {
            return false;
        };
        pair.value = value.to_string();
        self.normalize();
        self.propagation.debounce.arm(now);
        true
    }

    /// Pairs with both key and value present, trimmed.
    pub fn complete_pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|p| p.is_complete())
            .map(|p| (p.key.trim().to_string(), p.value.trim().to_string()))
            .collect()
    }

    pub fn value(&self) -> String {
        self.complete_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if !self.propagation.debounce.fire(now) {
            return None;
        }
        let value = self.value();
        self.propagation.emit(value)
    }

    pub fn flush(&mut self) -> Option<String> {
        self.propagation.debounce.cancel();
        let value = self.value();
        self.propagation.emit(value)
    }

    pub fn is_pending(&self) -> bool {
        self.propagation.debounce.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn assert_one_trailing_empty(entries: &[String]) {
        assert_eq!(entries.last().map(String::as_str), Some(""));
        if entries.len() > 1 {
            assert!(!entries[entries.len() - 2].trim().is_empty(), "{:?}", entries);
        }
    }

    #[test]
    fn test_csv_initial_split() {
        let editor = CsvEditor::new("domains", "a,b", DELAY);
        assert_eq!(editor.entries(), &["a", "b", ""]);
        assert_eq!(CsvEditor::new("d", "", DELAY).entries(), &[""]);
        assert_eq!(editor.field_name(1), "domains-1");
    }

    #[test]
    fn test_csv_edit_last_and_flush() {
        let now = Instant::now();
        let mut editor = CsvEditor::new("domains", "a,b", DELAY);
        assert!(editor.set(2, "c", now));
        assert_eq!(editor.entries(), &["a", "b", "c", ""]);
        assert_eq!(editor.flush(), Some("a,b,c".to_string()));
        assert_eq!(editor.flush(), None);
    }

    #[test]
    fn test_csv_debounced_propagation() {
        let t0 = Instant::now();
        let mut editor = CsvEditor::new("domains", "", DELAY);
        editor.set(0, "x", t0);
        editor.set(0, "xy", t0 + Duration::from_millis(300));
        assert!(editor.is_pending());
        assert_eq!(editor.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(editor.poll(t0 + Duration::from_millis(800)), Some("xy".to_string()));
        assert!(!editor.is_pending());
        assert_eq!(editor.poll(t0 + Duration::from_millis(2000)), None);

        // Typing and undoing before the deadline emits nothing.
        editor.set(1, "z", t0 + Duration::from_millis(900));
        editor.set(1, "", t0 + Duration::from_millis(950));
        assert_eq!(editor.poll(t0 + Duration::from_millis(1500)), None);
    }

    #[test]
    fn test_csv_invariants_after_edit_sequence() {
        let now = Instant::now();
        let mut editor = CsvEditor::new("d", " a ,,b", DELAY);
        assert_one_trailing_empty(editor.entries());

        let edits: [(usize, &str); 8] = [
            (3, "c"),
            (0, ""),
            (4, "  "),
            (3, ""),
            (2, "d"),
            (1, ""),
            (0, "e"),
            (9, "ignored"),
        ];
        for (index, value) in edits {
            editor.set(index, value, now);
            assert_one_trailing_empty(editor.entries());
            assert!(editor.value().split(',').all(|v| !v.is_empty()) || editor.value().is_empty());
        }
        assert!(!editor.value().contains(",,"));
        editor.remove(0, now);
        assert_one_trailing_empty(editor.entries());
    }

    #[test]
    fn test_csv_trailing_blank_entries_collapse() {
        let now = Instant::now();
        let mut editor = CsvEditor::new("d", "a,b,c", DELAY);
        editor.set(2, "", now);
        assert_eq!(editor.entries(), &["a", "b", ""]);
        editor.set(0, "", now);
        assert_eq!(editor.entries(), &["", "b", ""]);
        assert_eq!(editor.value(), "b");
    }

    #[test]
    fn test_key_value_parse_and_value() {
        let editor = KeyValueEditor::new("labels", "env=prod&tier=gold&bad&a=b=c", DELAY);
        assert_eq!(editor.pairs().len(), 3);
        assert_eq!(editor.pairs()[2], KeyValuePair::default());
        assert_eq!(editor.value(), "env=prod&tier=gold");
        assert_eq!(editor.key_field_name(0), "labels-key-0");
        assert_eq!(editor.value_field_name(2), "labels-value-2");
        assert_eq!(KeyValueEditor::new("l", "", DELAY).pairs().len(), 1);
    }

    #[test]
    fn test_key_value_incomplete_pairs_not_reported() {
        let now = Instant::now();
        let mut editor = KeyValueEditor::new("labels", "", DELAY);
        editor.set_key(0, "zone", now);
        assert_eq!(editor.pairs().len(), 2);
        assert_eq!(editor.value(), "");
        assert_eq!(editor.flush(), None);

        editor.set_value(0, "a", now);
        assert_eq!(editor.flush(), Some("zone=a".to_string()));

        // An empty first pair must not leave a leading separator.
        editor.set_key(0, "", now);
        editor.set_key(1, "rack", now);
        editor.set_value(1, "r1", now);
        assert_eq!(editor.value(), "rack=r1");
        assert_eq!(editor.pairs().last(), Some(&KeyValuePair::default()));
    }

    #[test]
    fn test_committed_baseline() {
        let mut editor = CsvEditor::from_entries("d", vec!["a".to_string(), "b".to_string()], DELAY)
            .committed("a");
        assert_eq!(editor.flush(), Some("a,b".to_string()));

        let mut kv = KeyValueEditor::from_pairs(
            "l",
            vec![KeyValuePair {
                key: "k".to_string(),
                value: "v".to_string(),
            }],
            DELAY,
        )
        .committed("k=v");
        assert_eq!(kv.flush(), None);
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_entries_survive_hidden_fields() {
        let posted = form(&[
            ("labels-key-0", "note"),
            ("labels-value-0", "a=b&c"),
            ("labels-key-1", "half"),
            ("labels-value-1", ""),
            ("domains-0", "x.example.com,y.example.com"),
            ("domains-1", ""),
        ]);
        let labels = KeyValueEditor::from_form("labels", &posted, DELAY);
        let domains = CsvEditor::from_form("domains", &posted, DELAY);

        let carried: HashMap<String, String> = labels
            .entry_fields()
            .into_iter()
            .chain(domains.entry_fields())
            .collect();
        let labels = KeyValueEditor::from_form("labels", &carried, DELAY);
        let domains = CsvEditor::from_form("domains", &carried, DELAY);

        assert_eq!(labels.complete_pairs(), vec![("note".to_string(), "a=b&c".to_string())]);
        assert_eq!(labels.pairs()[1].key, "half");
        assert_eq!(domains.entries(), &["x.example.com,y.example.com", ""]);
    }

    #[test]
    fn test_from_form_falls_back_to_committed_value() {
        let mut domains = CsvEditor::from_form("domains", &form(&[("domains", "a,b")]), DELAY);
        assert_eq!(domains.entries(), &["a", "b", ""]);
        assert_eq!(domains.committed_value(), "a,b");
        assert_eq!(domains.flush(), None);

        let mut labels = KeyValueEditor::from_form(
            "labels",
            &form(&[("labels", "zone=a"), ("labels-key-0", "zone"), ("labels-value-0", "b")]),
            DELAY,
        );
        assert_eq!(labels.flush(), Some("zone=b".to_string()));
        assert_eq!(labels.committed_value(), "zone=b");
    }

    #[test]
    fn test_debouncer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        assert!(!d.fire(t0));
        d.arm(t0);
        assert!(!d.fire(t0 + Duration::from_millis(499)));
        assert!(d.fire(t0 + DELAY));
        assert!(!d.fire(t0 + DELAY));
        d.arm(t0);
        d.cancel();
        assert!(!d.is_pending());
    }
}
