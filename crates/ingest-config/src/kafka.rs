//! Kafka broker settings for the events topic.

use crate::env::EnvSource;

#[derive(Clone, PartialEq, Eq)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub sasl_username: String,
    pub sasl_password: String,
}

impl KafkaConfig {
    pub fn from_source(env: &impl EnvSource) -> Self {
        let mut brokers = env.list("KAFKA_URL");
        if brokers.is_empty() {
            brokers.push("localhost:9092".to_string());
        }

        Self {
            brokers,
            topic: env.string_or("EVENTS_TOPIC", "test-topic"),
            sasl_username: env.string_or("KAFKA_SASL_USERNAME", ""),
            sasl_password: env.string_or("KAFKA_SASL_PASSWORD", ""),
        }
    }

    pub fn has_sasl_credentials(&self) -> bool {
        !self.sasl_username.is_empty() && !self.sasl_password.is_empty()
    }
}

impl std::fmt::Debug for KafkaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaConfig")
            .field("brokers", &self.brokers)
            .field("topic", &self.topic)
            .field("sasl_username", &self.sasl_username)
            .field("sasl_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_broker_list() {
        let env: HashMap<String, String> = [
            ("KAFKA_URL", "k0:9092,k1:9092"),
            ("EVENTS_TOPIC", "events"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = KafkaConfig::from_source(&env);

        assert_eq!(config.brokers, vec!["k0:9092", "k1:9092"]);
        assert_eq!(config.topic, "events");
        assert!(!config.has_sasl_credentials());
    }

    #[test]
    fn test_defaults() {
        let config = KafkaConfig::from_source(&HashMap::<String, String>::new());

        assert_eq!(config.brokers, vec!["localhost:9092"]);
        assert_eq!(config.topic, "test-topic");
    }
}
