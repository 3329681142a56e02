//! Multi-step wizard. Tracks the current step and applies button presses;
//! whether a step may advance is decided by the caller through each
//! button's `enabled` flag.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Next,
    Back,
    To(isize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    Next,
    Back,
    To(isize),
    /// Does not move; the caller acts on the named action.
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardButton {
    pub label: String,
    pub kind: ButtonKind,
    pub enabled: bool,
}

impl WizardButton {
    pub fn next(label: &str, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            kind: ButtonKind::Next,
            enabled,
        }
    }

    pub fn back(label: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: ButtonKind::Back,
            enabled: true,
        }
    }

    pub fn to(label: &str, page: isize) -> Self {
        Self {
            label: label.to_string(),
            kind: ButtonKind::To(page),
            enabled: true,
        }
    }

    pub fn custom(label: &str, action: &str, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            kind: ButtonKind::Custom(action.to_string()),
            enabled,
        }
    }

    pub fn id(&self) -> String {
        format!("wizard-button-{}", self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub label: String,
    pub buttons: Vec<WizardButton>,
}

impl WizardStep {
    pub fn new(label: &str, buttons: Vec<WizardButton>) -> Self {
        Self {
            label: label.to_string(),
            buttons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLink {
    pub index: usize,
    pub label: String,
    pub id: String,
    pub selected: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    current: usize,
    pub for_modal: bool,
    pub loading_step: bool,
}

impl Wizard {
    pub fn new(steps: Vec<WizardStep>) -> Self {
        Self {
            steps,
            current: 0,
            for_modal: false,
            loading_step: false,
        }
    }

    /// Starts at `index`, clamped into range.
    pub fn at(steps: Vec<WizardStep>, index: isize) -> Self {
        let mut w = Self::new(steps);
        w.page_change(PageChange::To(index));
        w
    }

    pub fn modal(mut self) -> Self {
        self.for_modal = true;
        self
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn page_change(&mut self, change: PageChange) -> usize {
        if self.steps.is_empty() {
            self.current = 0;
            return 0;
        }
        let last = (self.steps.len() - 1) as isize;
        let current = self.current as isize;
        let target = match change {
            PageChange::Next => current + 1,
            PageChange::Back => current - 1,
            PageChange::To(page) => page,
        };
        self.current = target.clamp(0, last) as usize;
        self.current
    }

    /// Presses the current step's button with `label`. Returns the kind of
    /// the pressed button, or None when it does not exist or is disabled.
    pub fn press(&mut self, label: &str) -> Option<ButtonKind> {
        let kind = self
            .current_step()?
            .buttons
            .iter()
            .find(|b| b.label == label && b.enabled)?
            .kind
            .clone();
        match &kind {
            ButtonKind::Next => {
                self.page_change(PageChange::Next);
            }
            ButtonKind::Back => {
                self.page_change(PageChange::Back);
            }
            ButtonKind::To(page) => {
                self.page_change(PageChange::To(*page));
            }
            ButtonKind::Custom(_) => {}
        }
        Some(kind)
    }

    pub fn step_list(&self) -> Vec<StepLink> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepLink {
                index,
                label: step.label.clone(),
                id: format!("wizard-step-{}", step.label.to_lowercase().replace(' ', "-")),
                selected: index == self.current,
                disabled: self.for_modal && index > self.current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: usize) -> Vec<WizardStep> {
        (0..n)
            .map(|i| {
                WizardStep::new(
                    &format!("Step {}", i),
                    vec![
                        WizardButton::back("Back"),
                        WizardButton::next("Next", i != 1),
                        WizardButton::to("First", 0),
                        WizardButton::custom("Create", "create", true),
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn test_next_clamps_at_last_step() {
        let mut w = Wizard::new(steps(3));
        for _ in 0..5 {
            w.page_change(PageChange::Next);
        }
        assert_eq!(w.current(), 2);
        assert!(w.is_last());
    }

    #[test]
    fn test_back_and_jump_clamp() {
        let mut w = Wizard::new(steps(3));
        assert_eq!(w.page_change(PageChange::Back), 0);
        assert_eq!(w.page_change(PageChange::To(-4)), 0);
        assert_eq!(w.page_change(PageChange::To(99)), 2);
        assert_eq!(w.page_change(PageChange::To(1)), 1);
        assert_eq!(Wizard::at(steps(3), 7).current(), 2);
    }

    #[test]
    fn test_index_stays_in_range_for_any_sequence() {
        let changes = [
            PageChange::Next,
            PageChange::To(-1),
            PageChange::Back,
            PageChange::To(3),
            PageChange::Next,
            PageChange::Back,
            PageChange::To(isize::MAX),
            PageChange::To(isize::MIN),
        ];
        for n in 1..5 {
            let mut w = Wizard::new(steps(n));
            for (i, c) in changes.iter().cycle().take(64).enumerate() {
                let idx = w.page_change(*c);
                assert!(idx < n, "step {} out of range after change {}", idx, i);
            }
        }
    }

    #[test]
    fn test_empty_wizard() {
        let mut w = Wizard::new(Vec::new());
        assert!(w.is_empty());
        assert_eq!(w.page_change(PageChange::Next), 0);
        assert!(w.current_step().is_none());
        assert_eq!(w.press("Next"), None);
        assert!(w.step_list().is_empty());
    }

    #[test]
    fn test_press_buttons() {
        let mut w = Wizard::new(steps(3));
        assert_eq!(w.press("Next"), Some(ButtonKind::Next));
        assert_eq!(w.current(), 1);

        // Step 1 has its Next button disabled.
        assert_eq!(w.press("Next"), None);
        assert_eq!(w.current(), 1);

        assert_eq!(w.press("Create"), Some(ButtonKind::Custom("create".to_string())));
        assert_eq!(w.current(), 1);

        assert_eq!(w.press("Back"), Some(ButtonKind::Back));
        assert_eq!(w.current(), 0);

        w.page_change(PageChange::To(2));
        assert_eq!(w.press("First"), Some(ButtonKind::To(0)));
        assert_eq!(w.current(), 0);
        assert_eq!(w.press("Missing"), None);
    }

    #[test]
    fn test_step_list_ids_and_modal_disabling() {
        let mut w = Wizard::new(vec![
            WizardStep::new("Tenant Setup", Vec::new()),
            WizardStep::new("Pool", Vec::new()),
            WizardStep::new("Review", Vec::new()),
        ])
        .modal();
        w.page_change(PageChange::Next);
        let links = w.step_list();
        assert_eq!(links[0].id, "wizard-step-tenant-setup");
        assert!(!links[0].disabled);
        assert!(links[1].selected);
        assert!(links[2].disabled);

        w.for_modal = false;
        assert!(w.step_list().iter().all(|l| !l.disabled));
        assert_eq!(WizardButton::next("Next", true).id(), "wizard-button-Next");
    }
}
