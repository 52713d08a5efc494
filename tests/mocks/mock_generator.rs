use async_trait::async_trait;
use birthday_greeter::domain::GreetingMessage;
use birthday_greeter::error::{GenerateError, GenerateResult};
use birthday_greeter::message::{MessageGenerator, MessageInput};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock message generator for testing.
///
/// Writes `Feliz cumple {name}! {suffix}` and can be told to fail for
/// specific names.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockGenerator {
    suffix: String,
    fail_for: Arc<Mutex<HashSet<String>>>,
    inputs: Arc<Mutex<Vec<MessageInput>>>,
}

#[allow(dead_code)]
impl MockGenerator {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            ..Default::default()
        }
    }

    /// Fail generation whenever the contact is called `name`.
    pub fn fail_for(&self, name: &str) {
        self.fail_for.lock().unwrap().insert(name.to_string());
    }

    pub fn inputs(&self) -> Vec<MessageInput> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageGenerator for MockGenerator {
    async fn generate(&self, input: MessageInput) -> GenerateResult<GreetingMessage> {
        self.inputs.lock().unwrap().push(input.clone());

        if self.fail_for.lock().unwrap().contains(&input.name) {
            return Err(GenerateError::Other(format!("no template for {}", input.name)));
        }

        Ok(GreetingMessage::new(format!(
            "Feliz cumple {}! {}",
            input.name, self.suffix
        )))
    }
}
