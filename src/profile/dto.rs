use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

/// Replaced wholesale on every setup, removed on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// centimetres
    pub height: f64,
    /// kilograms
    pub weight: f64,
    pub country: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disorders: Option<String>,
    pub goal: Goal,
}

impl UserProfile {
    /// Health conditions as sent to the meal planner.
    pub fn disorders_or_none(&self) -> &str {
        match self.disorders.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => "None",
        }
    }

    /// Same limits the setup form enforces.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if self.name.trim().chars().count() < 2 {
            problems.push("Name must be at least 2 characters.".to_string());
        }
        if !(12..=100).contains(&self.age) {
            problems.push("Age must be between 12 and 100.".to_string());
        }
        if !(100.0..=250.0).contains(&self.height) {
            problems.push("Height must be between 100 and 250 cm.".to_string());
        }
        if !(30.0..=300.0).contains(&self.weight) {
            problems.push("Weight must be between 30 and 300 kg.".to_string());
        }
        if self.country.trim().chars().count() < 2 {
            problems.push("Please enter your country.".to_string());
        }
        if self.state.trim().chars().count() < 2 {
            problems.push("Please enter your state or region.".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_profile(goal: Goal) -> UserProfile {
    UserProfile {
        name: "Priya".into(),
        age: 25,
        height: 180.0,
        weight: 75.0,
        country: "India".into(),
        state: "Kerala".into(),
        disorders: None,
        goal,
    }
}
