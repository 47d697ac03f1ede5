//! services/cli/src/menu/payment.rs
//!
//! Payment-method selection and the method-specific prompts. No live
//! gateway exists; once a method's details pass validation the payment
//! is considered collected.

use std::io;
use std::sync::OnceLock;

use regex::Regex;

use library_core::PaymentMethod;

use crate::menu::input::{prompt, read_choice};

fn card_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 13 to 19 digits, spaces or dashes allowed between them.
    RE.get_or_init(|| Regex::new(r"^\d(?:[ -]?\d){12,18}$").expect("static pattern compiles"))
}

fn card_cvv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3,4}$").expect("static pattern compiles"))
}

fn card_expiry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // MM/YY or MM/YYYY.
    RE.get_or_init(|| {
        Regex::new(r"^(0[1-9]|1[0-2])/(\d{2}|\d{4})$").expect("static pattern compiles")
    })
}

pub fn is_valid_card_number(s: &str) -> bool {
    card_number_re().is_match(s)
}

pub fn is_valid_card_cvv(s: &str) -> bool {
    card_cvv_re().is_match(s)
}

pub fn is_valid_card_expiry(s: &str) -> bool {
    card_expiry_re().is_match(s)
}

/// Walks the operator through choosing a payment method, including the
/// method-specific details.
pub fn choose_method() -> io::Result<PaymentMethod> {
    println!("\nSelect Payment method");
    for (i, method) in PaymentMethod::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, method);
    }
    let choice = read_choice("Enter payment method (1-5): ", 1, 5)?;
    let method = PaymentMethod::ALL[(choice - 1) as usize];

    println!("\nProcessing payment via {method}....");
    match method {
        PaymentMethod::Cash => println!("Cash payment received"),
        PaymentMethod::Card => collect_card_details()?,
        PaymentMethod::Upi => {
            let upi_id = prompt("Enter your UPI ID: ")?;
            println!("UPI payment processed for {upi_id}");
        }
        PaymentMethod::NetBanking => {
            let bank = prompt("Enter bank name: ")?;
            println!("Net banking payment processed via {bank}");
        }
        PaymentMethod::DigitalWallet => {
            let wallet = prompt("Enter wallet name (PayTM/PhonePe/GooglePay): ")?;
            println!("Digital wallet payment processed via {wallet}");
        }
    }
    Ok(method)
}

fn collect_card_details() -> io::Result<()> {
    loop {
        let number = prompt("Enter your card number: ")?;
        let cvv = prompt("Enter CVV: ")?;
        let expiry = prompt("Enter expiry date (MM/YY or MM/YYYY): ")?;

        if is_valid_card_number(&number) && is_valid_card_cvv(&cvv) && is_valid_card_expiry(&expiry)
        {
            let shown: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
            println!("Card payment processed for card ending in {}", &shown[shown.len() - 4..]);
            return Ok(());
        }
        println!("Card details are not valid, please re-enter.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_numbers_allow_separators() {
        assert!(is_valid_card_number("4111111111111111"));
        assert!(is_valid_card_number("4111 1111 1111 1111"));
        assert!(is_valid_card_number("4111-1111-1111-1111"));
        assert!(!is_valid_card_number("411111111111")); // 12 digits
        assert!(!is_valid_card_number("41111111111111111111")); // 20 digits
        assert!(!is_valid_card_number("4111x1111"));
    }

    #[test]
    fn cvv_is_three_or_four_digits() {
        assert!(is_valid_card_cvv("123"));
        assert!(is_valid_card_cvv("1234"));
        assert!(!is_valid_card_cvv("12"));
        assert!(!is_valid_card_cvv("12345"));
    }

    #[test]
    fn expiry_accepts_short_and_long_years() {
        assert!(is_valid_card_expiry("01/27"));
        assert!(is_valid_card_expiry("12/2027"));
        assert!(!is_valid_card_expiry("13/27"));
        assert!(!is_valid_card_expiry("00/27"));
        assert!(!is_valid_card_expiry("1/27"));
    }
}
