//! Outbound email.

use async_trait::async_trait;
use shopsmart_core::{Interface, Product, ShopResult, User};
use std::fmt::Write;
use tracing::info;

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Password reset link for `user`.
    #[must_use]
    pub fn password_reset(user: &User, reset_link: &str) -> Self {
        Self {
            to: user.email.clone(),
            subject: "Reset password from ShopSmart".to_string(),
            body: format!("Dear {}, here is your reset password link:\n{reset_link}", user.name),
        }
    }

    /// Alert for a single product at or below the low-stock threshold.
    #[must_use]
    pub fn low_stock_alert(admin_address: &str, product: &Product) -> Self {
        Self {
            to: admin_address.to_string(),
            subject: "Stock low alert".to_string(),
            body: format!(
                "Dear admin, product '{}' ({}) has low stock ({}). Please restock it.",
                product.name, product.id, product.stock
            ),
        }
    }

    /// Daily report listing every low-stock product.
    #[must_use]
    pub fn low_stock_report(admin_address: &str, products: &[Product]) -> Self {
        let mut body = String::from("Dear admin, the following products are low on stock:\n");
        for product in products {
            let _ = writeln!(body, "- {} ({}): {} left", product.name, product.id, product.stock);
        }
        Self {
            to: admin_address.to_string(),
            subject: format!("Daily low stock report: {} product(s)", products.len()),
            body,
        }
    }
}

/// Delivers email.
#[async_trait]
pub trait Mailer: Interface + Send + Sync {
    async fn send(&self, message: MailMessage) -> ShopResult<()>;
}

/// Mailer that writes messages to the log instead of a mail server.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from_address: String,
}

impl LogMailer {
    #[must_use]
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> ShopResult<()> {
        info!(
            from = %self.from_address,
            to = %message.to,
            subject = %message.subject,
            "Sending email"
        );
        tracing::debug!(body = %message.body, "Email body");
        Ok(())
    }
}
