//! Outbound mail: the sender seam, an SMTP implementation and a logging
//! stand-in for environments without SMTP.

use async_trait::async_trait;
use configs::MailConfig;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("message build failed: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp failure: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Structured payment-slip payload rendered as a text attachment.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PaymentSlip {
    pub payer: String,
    pub purpose: String,
    pub payee: String,
    pub payee_account: String,
    pub amount: Decimal,
    #[serde(default)]
    pub reference_model: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
}

impl PaymentSlip {
    pub fn render(&self) -> String {
        let mut out = format!(
            "PAYMENT SLIP\n\
             Payer:           {}\n\
             Purpose:         {}\n\
             Payee:           {}\n\
             Payee account:   {}\n\
             Amount:          {:.2}\n",
            self.payer, self.purpose, self.payee, self.payee_account, self.amount
        );
        if let Some(model) = &self.reference_model {
            out.push_str(&format!("Reference model: {}\n", model));
        }
        if let Some(number) = &self.reference_number {
            out.push_str(&format!("Reference no.:   {}\n", number));
        }
        out
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub payment_slip: Option<PaymentSlip>,
}

/// What happened to a mail that was accepted for sending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the transport.
    Sent,
    /// Dropped because no transport is configured.
    Skipped,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, MailError>;
}

/// SMTP delivery through lettre's tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(cfg: &MailConfig) -> Result<Self, MailError> {
        let builder = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
        };
        let mut builder = builder.port(cfg.port);
        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        info!(service = "mail", event = "smtp_configured", host = %cfg.host, port = cfg.port);
        Ok(Self { transport: builder.build(), from: cfg.from.parse()? })
    }
}

/// Assemble the MIME message; a slip becomes a second, attached part.
pub fn build_message(from: Mailbox, mail: &OutgoingMail) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from)
        .to(mail.to.parse::<Mailbox>()?)
        .subject(mail.subject.clone());
    let message = match &mail.payment_slip {
        None => builder.header(ContentType::TEXT_PLAIN).body(mail.body.clone())?,
        Some(slip) => builder.multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(
                    Attachment::new("payment-slip.txt".to_string())
                        .body(slip.render(), ContentType::TEXT_PLAIN),
                ),
        )?,
    };
    Ok(message)
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, MailError> {
        let message = build_message(self.from.clone(), mail)?;
        self.transport.send(message).await?;
        info!(service = "mail", event = "sent", to = %mail.to, with_slip = mail.payment_slip.is_some());
        Ok(Delivery::Sent)
    }
}

/// Used when no SMTP server is configured: validates and logs, delivers nothing.
pub struct NoopMailer;

#[async_trait]
impl MailSender for NoopMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<Delivery, MailError> {
        mail.to.parse::<Mailbox>()?;
        info!(service = "mail", event = "skipped", to = %mail.to, subject = %mail.subject, "smtp not configured");
        Ok(Delivery::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slip() -> PaymentSlip {
        PaymentSlip {
            payer: "Marko Jovic".into(),
            purpose: "Kindergarten fee".into(),
            payee: "Vrtic Sunce".into(),
            payee_account: "123-4567890123456-78".into(),
            amount: Decimal::new(500000, 2),
            reference_model: Some("97".into()),
            reference_number: Some("2026-01".into()),
        }
    }

    #[test]
    fn renders_slip_fields() {
        let text = slip().render();
        assert!(text.contains("Payee account:   123-4567890123456-78"));
        assert!(text.contains("Amount:          5000.00"));
        assert!(text.contains("Reference model: 97"));
        assert!(text.starts_with("PAYMENT SLIP\nPayer:           Marko Jovic\n"));
        assert!(text.ends_with("Reference no.:   2026-01\n"));
    }

    #[test]
    fn optional_references_are_left_out() {
        let text = PaymentSlip { reference_model: None, reference_number: None, ..slip() }.render();
        assert!(!text.contains("Reference"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn message_with_slip_is_multipart() {
        let mail = OutgoingMail {
            to: "parent@example.com".into(),
            subject: "Your payment slip".into(),
            body: "Payment slip attached.".into(),
            payment_slip: Some(slip()),
        };
        let msg = build_message("billing@example.com".parse().unwrap(), &mail).unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("payment-slip.txt"));
    }

    #[test]
    fn rejects_bad_recipient() {
        let mail = OutgoingMail {
            to: "not-an-address".into(),
            subject: "s".into(),
            body: "b".into(),
            payment_slip: None,
        };
        assert!(matches!(
            build_message("billing@example.com".parse().unwrap(), &mail),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn noop_mailer_reports_skipped() {
        let mail = OutgoingMail {
            to: "parent@example.com".into(),
            subject: "s".into(),
            body: "b".into(),
            payment_slip: None,
        };
        assert_eq!(NoopMailer.send(&mail).await.unwrap(), Delivery::Skipped);
        let bad = OutgoingMail { to: "nobody".into(), ..mail };
        assert!(matches!(NoopMailer.send(&bad).await, Err(MailError::Address(_))));
    }
}
