use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{AiClient, AiError, AnalyzeFoodOutput, DataUri, RequestConfig, WeeklyPlanInput, YogaPlanInput};
use crate::plans::dto::{sample_week, sample_yoga_week, DayMealPlan, DayYogaPlan};

/// Scripted stand-in for the AI service. `None` answers fail with a 500.
pub struct FakeAi {
    pub analysis: Option<AnalyzeFoodOutput>,
    pub weekly: Option<Vec<DayMealPlan>>,
    pub yoga: Option<Vec<DayYogaPlan>>,
    /// When set, weekly plan generation waits for a notification before answering.
    pub weekly_gate: Option<Arc<Notify>>,
    /// When set, yoga generation waits for a notification before answering.
    pub yoga_gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Analyze { mime_type: String, api_key: Option<String> },
    Weekly { input: WeeklyPlanInput, api_key: Option<String> },
    Yoga { input: YogaPlanInput, api_key: Option<String> },
}

impl Default for FakeAi {
    fn default() -> Self {
        Self {
            analysis: Some(sample_analysis()),
            weekly: Some(sample_week()),
            yoga: Some(sample_yoga_week()),
            weekly_gate: None,
            yoga_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

pub fn sample_analysis() -> AnalyzeFoodOutput {
    AnalyzeFoodOutput {
        dish_name: "Masala dosa".into(),
        ingredients: vec!["rice".into(), "urad dal".into(), "potato".into()],
        nutritional_information: "Calories: 300-400, Protein: 20g, Carbs: 50g, Fat: 10g".into(),
    }
}

fn failure() -> AiError {
    AiError::Api {
        status: 500,
        message: "scripted failure".into(),
    }
}

impl FakeAi {
    pub fn failing_weekly() -> Self {
        Self {
            weekly: None,
            ..Self::default()
        }
    }

    pub fn failing_yoga() -> Self {
        Self {
            yoga: None,
            ..Self::default()
        }
    }

    pub fn failing_analysis() -> Self {
        Self {
            analysis: None,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AiClient for FakeAi {
    async fn analyze_food(
        &self,
        payload: &DataUri,
        cfg: &RequestConfig,
    ) -> Result<AnalyzeFoodOutput, AiError> {
        self.record(Call::Analyze {
            mime_type: payload.mime_type.clone(),
            api_key: cfg.api_key.clone(),
        });
        self.analysis.clone().ok_or_else(failure)
    }

    async fn generate_weekly_plan(
        &self,
        input: &WeeklyPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayMealPlan>, AiError> {
        self.record(Call::Weekly {
            input: input.clone(),
            api_key: cfg.api_key.clone(),
        });
        if let Some(gate) = &self.weekly_gate {
            gate.notified().await;
        }
        self.weekly.clone().ok_or_else(failure)
    }

    async fn generate_yoga_plan(
        &self,
        input: &YogaPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayYogaPlan>, AiError> {
        self.record(Call::Yoga {
            input: input.clone(),
            api_key: cfg.api_key.clone(),
        });
        if let Some(gate) = &self.yoga_gate {
            gate.notified().await;
        }
        self.yoga.clone().ok_or_else(failure)
    }
}
