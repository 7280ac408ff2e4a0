use serde::{ Serialize, Deserialize };

/// Current contents of the lead-capture form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub full_name: String,
    pub email: String,
    pub automation_type: String,
    pub problem_description: String,
    pub budget: String,
    pub additional_notes: String,
}

impl LeadForm {
    pub fn reset(&mut self) {
        *self = LeadForm::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == LeadForm::default()
    }

    /// Names of required fields that are blank after trimming.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("automationType", &self.automation_type),
            ("problemDescription", &self.problem_description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub full_name: String,
    pub email: String,
    pub automation_type: String,
    pub problem_description: String,
    pub budget: String,
    pub additional_notes: String,
    pub submitted_at: String,
}

impl LeadSubmission {
    pub fn from_form(form: &LeadForm) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            automation_type: form.automation_type.trim().to_string(),
            problem_description: form.problem_description.trim().to_string(),
            budget: form.budget.trim().to_string(),
            additional_notes: form.additional_notes.trim().to_string(),
            submitted_at: super::iso_timestamp(),
        }
    }
}
