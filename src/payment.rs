//! Stripe Checkout, spoken over the actix-web client.

use actix_web::client::Client;
use anyhow::{anyhow, bail};
use serde::Deserialize;

use crate::{config::Config, models::appointments::Appointment};

const STRIPE_API: &str = "https://api.stripe.com/v1";

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid_for(&self, aid: &str) -> bool {
        self.payment_status.as_deref() == Some("paid")
            && self.client_reference_id.as_deref() == Some(aid)
    }
}

fn stripe_key(config: &Config) -> anyhow::Result<&str> {
    match &config.stripe_key {
        Some(key) => Ok(key),
        None => bail!("Online payment is not configured"),
    }
}

/// Form body for `POST /v1/checkout/sessions`. Amounts are whole currency
/// units and Stripe wants the smallest unit.
pub fn checkout_form(config: &Config, appointment: &Appointment) -> Vec<(&'static str, String)> {
    let success_url = format!(
        "{}/my-appointments?appointment_id={}&session_id={{CHECKOUT_SESSION_ID}}",
        config.frontend_url, appointment.aid
    );
    vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("client_reference_id", appointment.aid.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("line_items[0][price_data][currency]", config.currency.clone()),
        (
            "line_items[0][price_data][product_data][name]",
            format!("Appointment with ID {}", appointment.aid),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            (i64::from(appointment.amount) * 100).to_string(),
        ),
        ("success_url", success_url),
        ("cancel_url", config.frontend_url.clone()),
    ]
}

/// Opens a hosted checkout page. Returns as soon as Stripe has created the
/// session; payment is confirmed later through `retrieve_checkout_session`.
pub async fn create_checkout_session(
    config: &Config,
    appointment: &Appointment,
) -> anyhow::Result<CheckoutSession> {
    let key = stripe_key(config)?;
    let form = checkout_form(config, appointment);

    let mut res = Client::default()
        .post(format!("{}/checkout/sessions", STRIPE_API))
        .bearer_auth(key)
        .send_form(&form)
        .await
        .map_err(|err| anyhow!("Payment gateway error: {}", err))?;

    if !res.status().is_success() {
        let body = res
            .body()
            .await
            .map_err(|err| anyhow!("Payment gateway error: {}", err))?;
        log::error!(
            "Stripe refused checkout for {}: {}",
            appointment.aid,
            String::from_utf8_lossy(&body)
        );
        bail!("Payment gateway rejected the request");
    }

    res.json::<CheckoutSession>()
        .await
        .map_err(|err| anyhow!("Malformed payment gateway response: {}", err))
}

pub async fn retrieve_checkout_session(
    config: &Config,
    session_id: &str,
) -> anyhow::Result<CheckoutSession> {
    let key = stripe_key(config)?;
    if session_id.is_empty() || !session_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("Invalid checkout session id");
    }

    let mut res = Client::default()
        .get(format!("{}/checkout/sessions/{}", STRIPE_API, session_id))
        .bearer_auth(key)
        .send()
        .await
        .map_err(|err| anyhow!("Payment gateway error: {}", err))?;

    if !res.status().is_success() {
        bail!("Checkout session not found");
    }

    res.json::<CheckoutSession>()
        .await
        .map_err(|err| anyhow!("Malformed payment gateway response: {}", err))
}
