//! Wizard forms: add tenant and add pool. Every request carries the full
//! form in hidden fields, so a form is rebuilt from the posted fields on
//! each step.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::components::multi_value::{CsvEditor, KeyValueEditor};
use crate::components::wizard::{ButtonKind, PageChange, Wizard, WizardButton, WizardStep};
use crate::error::ConsoleError;
use crate::models::operator::{CreateTenantRequest, DomainsConfiguration, Pool, VolumeConfiguration};

pub const TENANT_STEPS: [&str; 4] = ["Setup", "Pool", "Configure", "Review"];
pub const POOL_STEPS: [&str; 2] = ["Pool", "Review"];
pub const CREATE_ACTION: &str = "create";

const GIB: i64 = 1024 * 1024 * 1024;
const MIN_VOLUMES: i64 = 4;

fn dns_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("Invalid regex"))
}

fn image_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)/(.+?):(.+)$").expect("Invalid regex"))
}

fn domain_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[a-zA-Z0-9\-.]+(:[0-9]+)?$").expect("Invalid regex"))
}

fn check_dns_name(field: &str, value: &str, min_len: usize) -> Option<ConsoleError> {
    if value.is_empty() {
        return Some(ConsoleError::validation(field, "required"));
    }
    if value.len() < min_len || value.len() > 63 {
        return Some(ConsoleError::validation(
            field,
            format!("must be between {} and 63 characters", min_len),
        ));
    }
    if !dns_label().is_match(value) {
        return Some(ConsoleError::validation(
            field,
            "may only contain lowercase letters, digits and '-', and must start and end with a letter or digit",
        ));
    }
    None
}

fn parse_positive(field: &str, value: &str) -> Result<i64, ConsoleError> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err(ConsoleError::validation(field, "must be at least 1")),
        Err(_) => Err(ConsoleError::validation(field, "must be a whole number")),
    }
}

fn field_map(errors: Vec<ConsoleError>) -> BTreeMap<String, String> {
    errors
        .into_iter()
        .filter_map(|e| match e {
            ConsoleError::Validation { field, message } => Some((field, message)),
            _ => None,
        })
        .collect()
}

/// Flushes an editor, returning its name and new value when it changed.
fn flush_csv(editor: &mut CsvEditor) -> Option<(String, String)> {
    editor.flush().map(|v| (editor.name.clone(), v))
}

fn flush_key_value(editor: &mut KeyValueEditor) -> Option<(String, String)> {
    editor.flush().map(|v| (editor.name.clone(), v))
}

/// Sizing of one pool, shared by the tenant and pool wizards.
#[derive(Debug, Clone)]
pub struct PoolFields {
    pub servers: String,
    pub volumes_per_server: String,
    pub volume_size_gi: String,
    pub labels: KeyValueEditor,
}

impl PoolFields {
    pub fn new(delay: Duration) -> Self {
        Self {
            servers: "4".to_string(),
            volumes_per_server: "4".to_string(),
            volume_size_gi: "10".to_string(),
            labels: KeyValueEditor::new("labels", "", delay),
        }
    }

    pub fn from_fields(fields: &HashMap<String, String>, delay: Duration) -> Self {
        let get = |k: &str| fields.get(k).cloned().unwrap_or_default();
        Self {
            servers: get("servers"),
            volumes_per_server: get("volumes_per_server"),
            volume_size_gi: get("volume_size_gi"),
            labels: KeyValueEditor::from_form("labels", fields, delay),
        }
    }

    pub fn errors(&self) -> Vec<ConsoleError> {
        let mut errors = Vec::new();
        let servers = parse_positive("servers", &self.servers);
        let volumes = parse_positive("volumes_per_server", &self.volumes_per_server);
        if let Err(e) = parse_positive("volume_size_gi", &self.volume_size_gi) {
            errors.push(e);
        }
        match (servers, volumes) {
            (Ok(s), Ok(v)) if s * v < MIN_VOLUMES => errors.push(ConsoleError::validation(
                "volumes_per_server",
                format!("a pool needs at least {} volumes in total", MIN_VOLUMES),
            )),
            (s, v) => {
                errors.extend(s.err());
                errors.extend(v.err());
            }
        }
        errors
    }

    pub fn to_pool(&self, name: &str, storage_class: &str) -> Result<Pool, ConsoleError> {
        let servers = parse_positive("servers", &self.servers)?;
        let volumes_per_server = parse_positive("volumes_per_server", &self.volumes_per_server)?;
        let size_gi = parse_positive("volume_size_gi", &self.volume_size_gi)?;
        let volumes_per_server = i32::try_from(volumes_per_server)
            .map_err(|_| ConsoleError::validation("volumes_per_server", "is too large"))?;
        Ok(Pool {
            name: name.to_string(),
            servers,
            volumes_per_server,
            volume_configuration: VolumeConfiguration {
                size: size_gi.saturating_mul(GIB),
                storage_class_name: storage_class.to_string(),
                labels: self.labels.complete_pairs().into_iter().collect(),
            },
        })
    }

    /// Hidden inputs for the pool fields. The plain fields and label
    /// entries are left out while the step that edits them is shown.
    fn hidden_fields(&self, editing: bool) -> Vec<(String, String)> {
        let mut hidden = Vec::new();
        if !editing {
            hidden.push(("servers".to_string(), self.servers.clone()));
            hidden.push(("volumes_per_server".to_string(), self.volumes_per_server.clone()));
            hidden.push(("volume_size_gi".to_string(), self.volume_size_gi.clone()));
            hidden.extend(self.labels.entry_fields());
        }
        hidden.push(("labels".to_string(), self.labels.committed_value().to_string()));
        hidden
    }
}

/// A form driven by a [`Wizard`].
pub trait WizardForm {
    /// The wizard for this form, positioned at `step`.
    fn wizard(&self, step: isize) -> Wizard;

    /// Flushes the form's editors; returns `(editor, value)` for each one
    /// whose value changed since the last commit.
    fn commit_editors(&mut self) -> Vec<(String, String)>;

    fn remove_entry(&mut self, _index: usize, _now: Instant) -> bool {
        false
    }
}

fn build_wizard(labels: &[&str], step: isize, is_step_valid: impl Fn(usize) -> bool, finish: &str) -> Wizard {
    let all_valid = (0..labels.len()).all(&is_step_valid);
    let steps = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut buttons = Vec::new();
            if i > 0 {
                buttons.push(WizardButton::back("Back"));
            }
            if i + 1 < labels.len() {
                buttons.push(WizardButton::next("Next", is_step_valid(i)));
            } else {
                buttons.push(WizardButton::custom(finish, CREATE_ACTION, all_valid));
            }
            WizardStep::new(label, buttons)
        })
        .collect();
    Wizard::at(steps, step).modal()
}

#[derive(Debug, Clone)]
pub struct TenantForm {
    pub name: String,
    pub namespace: String,
    pub storage_class: String,
    pub pool: PoolFields,
    pub image: String,
    pub domains: CsvEditor,
}

impl TenantForm {
    pub fn new(delay: Duration) -> Self {
        Self {
            name: String::new(),
            namespace: String::new(),
            storage_class: String::new(),
            pool: PoolFields::new(delay),
            image: String::new(),
            domains: CsvEditor::new("domains", "", delay),
        }
    }

    pub fn from_fields(fields: &HashMap<String, String>, delay: Duration) -> Self {
        let get = |k: &str| fields.get(k).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            name: get("name"),
            namespace: get("namespace"),
            storage_class: get("storage_class"),
            pool: PoolFields::from_fields(fields, delay),
            image: get("image"),
            domains: CsvEditor::from_form("domains", fields, delay),
        }
    }

    pub fn step_errors(&self, step: usize) -> Vec<ConsoleError> {
        let mut errors = Vec::new();
        match step {
            0 => {
                errors.extend(check_dns_name("name", &self.name, 3));
                errors.extend(check_dns_name("namespace", &self.namespace, 1));
            }
            1 => errors = self.pool.errors(),
            2 => {
                if !self.image.is_empty() && !image_ref().is_match(&self.image) {
                    errors.push(ConsoleError::validation(
                        "image",
                        "must look like registry/repository:tag",
                    ));
                }
                for (i, entry) in self.domains.entries().iter().enumerate() {
                    let entry = entry.trim();
                    if !entry.is_empty() && !domain_url().is_match(entry) {
                        errors.push(ConsoleError::validation(
                            self.domains.field_name(i),
                            "must look like http(s)://subdomain.domain",
                        ));
                    }
                }
            }
            _ => {}
        }
        errors
    }

    pub fn is_step_valid(&self, step: usize) -> bool {
        self.step_errors(step).is_empty()
    }

    /// Field name to message for the errors of one step.
    pub fn field_errors(&self, step: usize) -> BTreeMap<String, String> {
        field_map(self.step_errors(step))
    }

    pub fn first_invalid_step(&self) -> Option<usize> {
        (0..TENANT_STEPS.len()).find(|&s| !self.is_step_valid(s))
    }

    pub fn to_request(&self) -> Result<CreateTenantRequest, ConsoleError> {
        if let Some(step) = self.first_invalid_step() {
            return Err(self
                .step_errors(step)
                .into_iter()
                .next()
                .unwrap_or_else(|| ConsoleError::validation("form", "form is incomplete")));
        }
        let domains = self.domains.values();
        Ok(CreateTenantRequest {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            image: self.image.clone(),
            pools: vec![self.pool.to_pool("pool-0", &self.storage_class)?],
            domains: (!domains.is_empty()).then(|| DomainsConfiguration {
                minio: domains,
                console: String::new(),
            }),
        })
    }

    /// Hidden inputs for everything not edited on `step`. Committed editor
    /// values always travel as the baseline for the next post.
    pub fn hidden_fields(&self, step: usize) -> Vec<(String, String)> {
        let mut hidden: Vec<(String, String)> = [
            ("name", &self.name),
            ("namespace", &self.namespace),
            ("storage_class", &self.storage_class),
        ]
        .into_iter()
        .filter(|_| step != 0)
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
        hidden.extend(self.pool.hidden_fields(step == 1));
        if step != 2 {
            hidden.push(("image".to_string(), self.image.clone()));
            hidden.extend(self.domains.entry_fields());
        }
        hidden.push(("domains".to_string(), self.domains.committed_value().to_string()));
        hidden
    }
}

impl WizardForm for TenantForm {
    /// Next is only enabled while the step's fields are valid.
    fn wizard(&self, step: isize) -> Wizard {
        build_wizard(&TENANT_STEPS, step, |i| self.is_step_valid(i), "Create")
    }

    fn commit_editors(&mut self) -> Vec<(String, String)> {
        flush_key_value(&mut self.pool.labels)
            .into_iter()
            .chain(flush_csv(&mut self.domains))
            .collect()
    }

    fn remove_entry(&mut self, index: usize, now: Instant) -> bool {
        self.domains.remove(index, now)
    }
}

/// Adds a pool to an existing tenant.
#[derive(Debug, Clone)]
pub struct PoolForm {
    pub name: String,
    pub storage_class: String,
    pub pool: PoolFields,
    existing: Vec<String>,
}

impl PoolForm {
    /// Empty form whose default name follows the tenant's `pool-N` naming.
    pub fn new(existing: Vec<String>, delay: Duration) -> Self {
        let name = (existing.len()..)
            .map(|n| format!("pool-{}", n))
            .find(|candidate| !existing.contains(candidate))
            .unwrap_or_default();
        Self {
            name,
            storage_class: String::new(),
            pool: PoolFields::new(delay),
            existing,
        }
    }

    pub fn from_fields(fields: &HashMap<String, String>, existing: Vec<String>, delay: Duration) -> Self {
        let get = |k: &str| fields.get(k).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            name: get("pool_name"),
            storage_class: get("storage_class"),
            pool: PoolFields::from_fields(fields, delay),
            existing,
        }
    }

    pub fn step_errors(&self, step: usize) -> Vec<ConsoleError> {
        if step != 0 {
            return Vec::new();
        }
        let mut errors: Vec<ConsoleError> = check_dns_name("pool_name", &self.name, 1).into_iter().collect();
        if errors.is_empty() && self.existing.contains(&self.name) {
            errors.push(ConsoleError::validation("pool_name", "a pool with this name already exists"));
        }
        errors.extend(self.pool.errors());
        errors
    }

    pub fn is_step_valid(&self, step: usize) -> bool {
        self.step_errors(step).is_empty()
    }

    pub fn field_errors(&self, step: usize) -> BTreeMap<String, String> {
        field_map(self.step_errors(step))
    }

    pub fn to_pool(&self) -> Result<Pool, ConsoleError> {
        if let Some(e) = self.step_errors(0).into_iter().next() {
            return Err(e);
        }
        self.pool.to_pool(&self.name, &self.storage_class)
    }

    pub fn hidden_fields(&self, step: usize) -> Vec<(String, String)> {
        let mut hidden = Vec::new();
        if step != 0 {
            hidden.push(("pool_name".to_string(), self.name.clone()));
            hidden.push(("storage_class".to_string(), self.storage_class.clone()));
        }
        hidden.extend(self.pool.hidden_fields(step == 0));
        hidden
    }
}

impl WizardForm for PoolForm {
    fn wizard(&self, step: isize) -> Wizard {
        build_wizard(&POOL_STEPS, step, |i| self.is_step_valid(i), "Add Pool")
    }

    fn commit_editors(&mut self) -> Vec<(String, String)> {
        flush_key_value(&mut self.pool.labels).into_iter().collect()
    }
}

/// What the visitor asked for in one wizard post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardPost {
    pub step: isize,
    pub button: Option<String>,
    pub jump: Option<isize>,
    pub remove_entry: Option<usize>,
}

impl WizardPost {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            step: fields.get("step").and_then(|s| s.parse().ok()).unwrap_or(0),
            button: fields.get("button").filter(|b| !b.is_empty()).cloned(),
            jump: fields.get("jump").and_then(|j| j.parse().ok()),
            remove_entry: fields.get("remove_entry").and_then(|r| r.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Render the wizard at its current step; `show_errors` when a press
    /// was refused.
    Show { show_errors: bool },
    Create,
}

#[derive(Debug)]
pub struct Applied {
    pub wizard: Wizard,
    pub outcome: Outcome,
    /// Editors whose committed value changed with this post.
    pub changed: Vec<(String, String)>,
}

/// Applies a post to the form. Editors are committed last so that the
/// hidden fields of the next page carry the values this post produced.
pub fn apply<F: WizardForm>(form: &mut F, post: &WizardPost, now: Instant) -> Applied {
    let mut wizard = form.wizard(post.step);
    let mut outcome = Outcome::Show { show_errors: false };

    if let Some(index) = post.remove_entry {
        form.remove_entry(index, now);
        wizard = form.wizard(wizard.current() as isize);
    } else if let Some(target) = post.jump {
        // Step links only go back; forward moves use Next.
        if target >= 0 && (target as usize) <= wizard.current() {
            wizard.page_change(PageChange::To(target));
        }
    } else if let Some(label) = &post.button {
        outcome = match wizard.press(label) {
            Some(ButtonKind::Custom(action)) if action == CREATE_ACTION => {
                wizard.loading_step = true;
                Outcome::Create
            }
            Some(_) => Outcome::Show { show_errors: false },
            None => Outcome::Show { show_errors: true },
        };
    }

    let changed = form.commit_editors();
    Applied {
        wizard,
        outcome,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_fields() -> HashMap<String, String> {
        fields(&[
            ("name", "tenant-1"),
            ("namespace", "storage"),
            ("storage_class", "directpv-min-io"),
            ("servers", "4"),
            ("volumes_per_server", "2"),
            ("volume_size_gi", "100"),
        ])
    }

    fn press(step: isize, label: &str) -> WizardPost {
        WizardPost {
            step,
            button: Some(label.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_tenant_name_rules() {
        assert!(check_dns_name("name", "abc", 3).is_none());
        assert!(check_dns_name("name", "a-1-b", 3).is_none());
        assert!(check_dns_name("name", "ab", 3).is_some());
        assert!(check_dns_name("name", "-abc", 3).is_some());
        assert!(check_dns_name("name", "abc-", 3).is_some());
        assert!(check_dns_name("name", "ABC", 3).is_some());
        assert!(check_dns_name("name", "a_bc", 3).is_some());
        assert!(check_dns_name("name", &"a".repeat(64), 3).is_some());
        assert!(check_dns_name("name", &"a".repeat(63), 3).is_none());
        assert!(check_dns_name("namespace", "x", 1).is_none());
    }

    #[test]
    fn test_pool_step_validation() {
        let mut form = TenantForm::from_fields(&valid_fields(), DELAY);
        assert!(form.is_step_valid(1));

        form.pool.servers = "0".to_string();
        assert_eq!(form.field_errors(1).get("servers").map(String::as_str), Some("must be at least 1"));

        form.pool.servers = "two".to_string();
        assert!(form.field_errors(1).contains_key("servers"));

        form.pool.servers = "1".to_string();
        form.pool.volumes_per_server = "2".to_string();
        assert!(form.field_errors(1).contains_key("volumes_per_server"));

        form.pool.servers = "2".to_string();
        form.pool.volume_size_gi = "0".to_string();
        assert_eq!(form.field_errors(1).keys().collect::<Vec<_>>(), vec!["volume_size_gi"]);
    }

    #[test]
    fn test_configure_step_checks_image_and_domains() {
        let mut f = valid_fields();
        f.insert("domains-0".to_string(), "https://s3.example.com".to_string());
        f.insert("domains-1".to_string(), "x.example.com,y.example.com".to_string());
        let mut form = TenantForm::from_fields(&f, DELAY);
        assert!(form.is_step_valid(0));
        let errors = form.field_errors(2);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["domains-1"]);

        form.domains = CsvEditor::new("domains", "", DELAY);
        assert!(form.is_step_valid(2));
        form.image = "minio".to_string();
        assert!(!form.is_step_valid(2));
        form.image = "quay.io/minio/minio:RELEASE.2024-01-01".to_string();
        assert!(form.is_step_valid(2));
    }

    #[test]
    fn test_editor_entries_survive_later_steps() {
        let now = Instant::now();
        let mut f = valid_fields();
        f.insert("step".to_string(), "1".to_string());
        f.insert("labels-key-0".to_string(), "note".to_string());
        f.insert("labels-value-0".to_string(), "a=b".to_string());
        f.insert("labels-key-1".to_string(), "rack".to_string());
        f.insert("labels-value-1".to_string(), "".to_string());
        let mut form = TenantForm::from_fields(&f, DELAY);
        let applied = apply(&mut form, &WizardPost::from_fields(&f), now);
        assert_eq!(applied.wizard.current(), 1);
        assert_eq!(applied.changed, vec![("labels".to_string(), "note=a=b".to_string())]);

        // Configure shows domains; labels only travel in hidden fields.
        let mut f: HashMap<String, String> = form.hidden_fields(2).into_iter().collect();
        f.insert("domains-0".to_string(), "https://s3.example.com".to_string());
        let mut form = TenantForm::from_fields(&f, DELAY);
        assert_eq!(form.pool.labels.value(), "note=a=b");
        assert_eq!(form.pool.labels.pairs()[1].key, "rack");
        assert!(form.commit_editors().iter().any(|(k, _)| k == "domains"));

        // Review shows neither editor.
        let f: HashMap<String, String> = form.hidden_fields(3).into_iter().collect();
        let form = TenantForm::from_fields(&f, DELAY);
        assert_eq!(form.pool.labels.committed_value(), "note=a=b");
        assert_eq!(form.domains.committed_value(), "https://s3.example.com");
        let req = form.to_request().unwrap();
        assert_eq!(
            req.pools[0].volume_configuration.labels.get("note").map(String::as_str),
            Some("a=b")
        );
    }

    #[test]
    fn test_unchanged_editor_does_not_flush() {
        let mut f = valid_fields();
        f.insert("domains".to_string(), "https://a.example.com".to_string());
        f.insert("domains-0".to_string(), "https://a.example.com".to_string());
        f.insert("domains-1".to_string(), "".to_string());
        let mut form = TenantForm::from_fields(&f, DELAY);
        assert!(form.commit_editors().is_empty());
    }

    #[test]
    fn test_request_from_valid_form() {
        let mut f = valid_fields();
        f.insert("labels".to_string(), "tier=gold".to_string());
        f.insert("domains".to_string(), "https://s3.example.com".to_string());
        let form = TenantForm::from_fields(&f, DELAY);
        let req = form.to_request().unwrap();
        assert_eq!(req.name, "tenant-1");
        assert_eq!(req.pools.len(), 1);
        assert_eq!(req.pools[0].name, "pool-0");
        assert_eq!(req.pools[0].servers, 4);
        assert_eq!(req.pools[0].volumes_per_server, 2);
        assert_eq!(req.pools[0].volume_configuration.size, 100 * GIB);
        assert_eq!(
            req.pools[0].volume_configuration.labels.get("tier").map(String::as_str),
            Some("gold")
        );
        assert_eq!(
            req.domains.map(|d| d.minio),
            Some(vec!["https://s3.example.com".to_string()])
        );

        let empty = TenantForm::new(DELAY);
        let err = empty.to_request().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_hidden_fields_skip_current_step() {
        let form = TenantForm::from_fields(&valid_fields(), DELAY);
        let hidden = form.hidden_fields(0);
        assert!(!hidden.iter().any(|(k, _)| k == "name"));
        assert!(hidden.iter().any(|(k, v)| k == "servers" && v == "4"));
        assert!(hidden.iter().any(|(k, _)| k == "domains"));

        let on_pool = form.hidden_fields(1);
        assert!(!on_pool.iter().any(|(k, _)| k == "servers"));
        assert!(on_pool.iter().any(|(k, _)| k == "labels"));
        // name, namespace, storage_class, 3 pool fields, labels, image, domains
        assert_eq!(form.hidden_fields(3).len(), 9);
    }

    #[test]
    fn test_wizard_flow() {
        let now = Instant::now();
        let mut form = TenantForm::new(DELAY);

        // Setup is incomplete, so Next is refused.
        let applied = apply(&mut form, &press(0, "Next"), now);
        assert_eq!(applied.wizard.current(), 0);
        assert_eq!(applied.outcome, Outcome::Show { show_errors: true });

        let mut form = TenantForm::from_fields(&valid_fields(), DELAY);
        let applied = apply(&mut form, &press(0, "Next"), now);
        assert_eq!(applied.wizard.current(), 1);
        assert_eq!(applied.outcome, Outcome::Show { show_errors: false });
        assert!(!applied.wizard.loading_step);

        // Step links cannot skip ahead.
        let jump = WizardPost {
            step: 1,
            jump: Some(3),
            ..Default::default()
        };
        assert_eq!(apply(&mut form, &jump, now).wizard.current(), 1);
        let back = WizardPost {
            step: 1,
            jump: Some(0),
            ..Default::default()
        };
        assert_eq!(apply(&mut form, &back, now).wizard.current(), 0);

        let applied = apply(&mut form, &press(3, "Create"), now);
        assert_eq!(applied.outcome, Outcome::Create);
        assert!(applied.wizard.loading_step);
    }

    #[test]
    fn test_remove_domain_entry() {
        let now = Instant::now();
        let mut f = valid_fields();
        f.insert("domains".to_string(), "https://a.example.com,https://b.example.com".to_string());
        let mut form = TenantForm::from_fields(&f, DELAY);
        let post = WizardPost::from_fields(&fields(&[("step", "2"), ("remove_entry", "0")]));
        let applied = apply(&mut form, &post, now);
        assert_eq!(applied.wizard.current(), 2);
        assert_eq!(form.domains.value(), "https://b.example.com");
        assert_eq!(
            applied.changed,
            vec![("domains".to_string(), "https://b.example.com".to_string())]
        );
        assert_eq!(form.domains.committed_value(), "https://b.example.com");
    }

    #[test]
    fn test_pool_form_default_name_and_duplicates() {
        let existing = vec!["pool-0".to_string(), "pool-2".to_string()];
        let form = PoolForm::new(existing.clone(), DELAY);
        assert_eq!(form.name, "pool-3");
        assert!(form.is_step_valid(0));

        let f = fields(&[
            ("pool_name", "pool-0"),
            ("servers", "4"),
            ("volumes_per_server", "1"),
            ("volume_size_gi", "8"),
        ]);
        let form = PoolForm::from_fields(&f, existing, DELAY);
        assert_eq!(
            form.field_errors(0).get("pool_name").map(String::as_str),
            Some("a pool with this name already exists")
        );
        assert!(form.to_pool().is_err());
    }

    #[test]
    fn test_pool_wizard_adds_pool() {
        let now = Instant::now();
        let f = fields(&[
            ("pool_name", "pool-1"),
            ("storage_class", "fast"),
            ("servers", "2"),
            ("volumes_per_server", "2"),
            ("volume_size_gi", "50"),
            ("labels-key-0", "zone"),
            ("labels-value-0", "b"),
        ]);
        let mut form = PoolForm::from_fields(&f, vec!["pool-0".to_string()], DELAY);
        let applied = apply(&mut form, &press(0, "Next"), now);
        assert_eq!(applied.wizard.current(), 1);

        let carried: HashMap<String, String> = form.hidden_fields(1).into_iter().collect();
        let mut form = PoolForm::from_fields(&carried, vec!["pool-0".to_string()], DELAY);
        let applied = apply(&mut form, &press(1, "Add Pool"), now);
        assert_eq!(applied.outcome, Outcome::Create);

        let pool = form.to_pool().unwrap();
        assert_eq!(pool.name, "pool-1");
        assert_eq!(pool.servers, 2);
        assert_eq!(pool.volume_configuration.size, 50 * GIB);
        assert_eq!(pool.volume_configuration.storage_class_name, "fast");
        assert_eq!(pool.volume_configuration.labels.get("zone").map(String::as_str), Some("b"));
    }
}
