// Simulated payment processing for new bookings

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment declined for {guest_name}: {reason}")]
    Declined { guest_name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: f64,
    pub processed_at: DateTime<Utc>,
}

pub trait PaymentGateway {
    // Charge the guest the given amount; the booking only proceeds on Ok
    fn charge(&self, guest_name: &str, amount: f64) -> Result<PaymentReceipt, PaymentError>;
}

/// Gateway that approves every charge without contacting anyone.
#[derive(Debug, Default, Clone)]
pub struct SimulatedPaymentGateway;

impl PaymentGateway for SimulatedPaymentGateway {
    fn charge(&self, guest_name: &str, amount: f64) -> Result<PaymentReceipt, PaymentError> {
        let reference = format!("PAY-{:08X}", rand::random::<u32>());
        info!(guest = guest_name, amount, %reference, "simulated payment approved");

        Ok(PaymentReceipt {
            reference,
            amount,
            processed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_gateway_always_approves() {
        let gateway = SimulatedPaymentGateway;
        let receipt = gateway.charge("Alice", 200.0).unwrap();

        assert_eq!(receipt.amount, 200.0);
        assert!(receipt.reference.starts_with("PAY-"));
        assert_eq!(receipt.reference.len(), 12);
    }

    #[test]
    fn test_simulated_gateway_accepts_zero_amount() {
        let receipt = SimulatedPaymentGateway.charge("Bob", 0.0).unwrap();
        assert_eq!(receipt.amount, 0.0);
    }
}
