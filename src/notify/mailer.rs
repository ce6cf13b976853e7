// src/notify/mailer.rs

//! HTTP sending-API mail client.
//!
//! Talks to a Brevo-style transactional email endpoint: one POST with a JSON
//! payload and an api-key header. A non-2xx response is an error; delivery
//! beyond acceptance by the API is not tracked.

use std::time::Duration;

use serde::Serialize;

use crate::config::MailConfig;
use crate::error::{AppError, Result};

/// Transactional email client.
pub struct Mailer {
    api_url: String,
    api_key: String,
    sender_name: String,
    sender_email: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct Sender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct Recipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    sender: Sender<'a>,
    to: Vec<Recipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl Mailer {
    /// Create a mailer from mail configuration.
    ///
    /// The client carries the configured timeout so a hung sending API
    /// fails the run instead of stalling it.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender_name: config.sender_name.clone(),
            sender_email: config.sender_email.clone(),
            client,
        })
    }

    /// Send one HTML message to all recipients.
    pub async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<()> {
        let payload = Payload {
            sender: Sender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: recipients
                .iter()
                .map(|email| Recipient { email })
                .collect(),
            subject,
            html_content: html_body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::mail(format!(
                "sending API returned {status}: {body}"
            )));
        }

        Ok(())
    }
}
