use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Sends a one-time passcode to a phone number
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn deliver(&self, phone: &str, code: &str) -> Result<()>;
}

/// Development delivery that writes the passcode to the log
#[derive(Debug, Clone, Default)]
pub struct LogOtpDelivery;

#[async_trait]
impl OtpDelivery for LogOtpDelivery {
    async fn deliver(&self, phone: &str, code: &str) -> Result<()> {
        info!("One-time passcode for {}: {}", phone, code);
        Ok(())
    }
}

/// Delivery that keeps every passcode so tests can read it back
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOtpDelivery {
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl RecordingOtpDelivery {
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        let sent = self.sent.lock().ok()?;
        sent.iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, code)| code.clone())
    }
}

#[cfg(test)]
#[async_trait]
impl OtpDelivery for RecordingOtpDelivery {
    async fn deliver(&self, phone: &str, code: &str) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("delivery log poisoned"))?
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }
}
