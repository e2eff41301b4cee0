use super::definition::BusinessLogic;
use crate::error::ValidationError;

/// A trait for inputs that can be decoded into a [`BusinessLogic`].
///
/// This is the seam between whatever transport the caller uses and the compiler.
/// Text and `serde_json::Value` payloads are supported out of the box; callers with
/// their own configuration structs can implement it to provide a translation layer.
///
/// # Example
///
/// ```rust
/// use caseforge::logic::{BusinessLogic, IntoBusinessLogic, TaskSpec};
/// use caseforge::error::ValidationError;
///
/// struct Checklist { steps: Vec<String> }
///
/// impl IntoBusinessLogic for Checklist {
///     fn into_business_logic(self) -> Result<BusinessLogic, ValidationError> {
///         let tasks = self
///             .steps
///             .into_iter()
///             .map(|step| TaskSpec {
///                 slug: Some(step.to_lowercase()),
///                 display_name: Some(step),
///                 outcomes: Some(vec!["done".to_string()]),
///                 ..TaskSpec::default()
///             })
///             .collect();
///         Ok(BusinessLogic { tasks, patterns: vec![] })
///     }
/// }
///
/// let logic = Checklist { steps: vec!["Collect".into()] }.into_business_logic().unwrap();
/// assert_eq!(logic.tasks[0].slug.as_deref(), Some("collect"));
/// ```
pub trait IntoBusinessLogic {
    fn into_business_logic(self) -> Result<BusinessLogic, ValidationError>;
}

impl IntoBusinessLogic for BusinessLogic {
    fn into_business_logic(self) -> Result<BusinessLogic, ValidationError> {
        Ok(self)
    }
}

impl IntoBusinessLogic for serde_json::Value {
    fn into_business_logic(self) -> Result<BusinessLogic, ValidationError> {
        match self {
            // Payloads relayed through other tools often arrive JSON-encoded twice.
            serde_json::Value::String(text) => text.as_str().into_business_logic(),
            value => serde_json::from_value(value)
                .map_err(|e| ValidationError::Decode(e.to_string())),
        }
    }
}

impl IntoBusinessLogic for &str {
    fn into_business_logic(self) -> Result<BusinessLogic, ValidationError> {
        let value: serde_json::Value = serde_json::from_str(self.trim())
            .map_err(|e| ValidationError::Decode(e.to_string()))?;
        if let serde_json::Value::String(inner) = value {
            return serde_json::from_str(inner.trim())
                .map_err(|e| ValidationError::Decode(e.to_string()));
        }
        value.into_business_logic()
    }
}

impl IntoBusinessLogic for String {
    fn into_business_logic(self) -> Result<BusinessLogic, ValidationError> {
        self.as_str().into_business_logic()
    }
}
