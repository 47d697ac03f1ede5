//! services/cli/src/menu/input.rs
//!
//! Validated terminal input. The core only ever consumes the typed
//! values produced here; raw text never crosses the boundary.

use std::io::{self, Write};
use std::str::FromStr;

/// Prints `label` without a newline and reads one trimmed line.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn is_valid_phone(s: &str) -> bool {
    s.len() == 10 && s.chars().all(|c| c.is_ascii_digit())
}

/// Asks until a 10-digit phone number is supplied.
pub fn read_phone() -> io::Result<String> {
    loop {
        let value = prompt("Enter phone number (10 digits): ")?;
        if is_valid_phone(&value) {
            return Ok(value);
        }
        println!("Please enter a valid 10-digit phone number.");
    }
}

/// Asks until an integer in `min..=max` is supplied.
pub fn read_choice(label: &str, min: u32, max: u32) -> io::Result<u32> {
    loop {
        match prompt(label)?.parse::<u32>() {
            Ok(n) if (min..=max).contains(&n) => return Ok(n),
            Ok(_) => {
                println!("Invalid choice! Please select a number between {min} and {max}.")
            }
            Err(_) => println!("Please enter a valid number."),
        }
    }
}

/// Asks until the answer is a recognizable yes or no.
pub fn read_yes_no(label: &str) -> io::Result<bool> {
    loop {
        match prompt(label)?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

/// Asks until a non-empty line is supplied.
pub fn read_text(label: &str) -> io::Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("A value is required.");
    }
}

/// Reads a line that may be left empty.
pub fn read_optional(label: &str) -> io::Result<String> {
    prompt(label)
}

/// Asks until the line parses as `T`.
pub fn read_number<T: FromStr>(label: &str) -> io::Result<T> {
    loop {
        if let Ok(n) = prompt(label)?.parse::<T>() {
            return Ok(n);
        }
        println!("Please enter a valid number.");
    }
}

/// Reads an optional numeric field: empty keeps the current value.
pub fn read_optional_number<T: FromStr>(label: &str) -> io::Result<Option<T>> {
    loop {
        let value = prompt(label)?;
        if value.is_empty() {
            return Ok(None);
        }
        if let Ok(n) = value.parse::<T>() {
            return Ok(Some(n));
        }
        println!("Please enter a valid number or leave the field empty.");
    }
}

#[cfg(test)]
mod tests {
    use super::is_valid_phone;

    #[test]
    fn phone_numbers_are_ten_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("987654321x"));
        assert!(!is_valid_phone(""));
    }
}
