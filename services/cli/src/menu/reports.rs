//! services/cli/src/menu/reports.rs
//!
//! Read-only presentation of query results. Nothing in here mutates or
//! persists state.

use chrono::{DateTime, Utc};

use library_core::{Book, Library, LoanRecord, MembershipPlan, Money};

const RULE: &str = "--------------------------------------------------------------------------------";

pub fn print_books(results: &[&Book]) {
    if results.is_empty() {
        println!("No books found matching your search criteria.");
        return;
    }
    println!("\nFound {} book(s):", results.len());
    println!("{RULE}");
    for book in results {
        let stock_status = if book.stock > 0 {
            format!("In stock ({})", book.stock)
        } else {
            "Out of stock".to_string()
        };
        println!("Title: {}", book.title);
        println!("Author: {}", book.author);
        println!("Genre: {}", book.genre);
        println!("Price: {}", book.price);
        println!("Stock: {stock_status}");
        println!("{RULE}");
    }
}

pub fn print_book_details(book: &Book) {
    println!("  Title: {}", book.title);
    println!("  Author: {}", book.author);
    println!("  Year: {}", book.year);
    println!("  Genre: {}", book.genre);
    println!("  Pages: {}", book.pages);
    println!("  ISBN: {}", book.isbn);
    println!("  Rating: {}", book.rating);
    println!("  Language: {}", book.language);
    println!("  Stock: {}", book.stock);
    println!("  Price: {}", book.price);
}

fn print_loan_timing(loan: &LoanRecord, now: DateTime<Utc>) {
    let remaining = (loan.due_at - now).num_days();
    if remaining < 0 {
        println!("  Status: OVERDUE by {} days", -remaining);
    } else {
        println!("  Status: {remaining} days remaining");
    }
}

/// The reader's details, currently held books and recent history.
pub fn print_reader_profile(library: &Library, phone: &str, now: DateTime<Utc>) {
    let Some(reader) = library.reader_by_phone(phone) else {
        println!("Reader not found");
        return;
    };

    println!("\n---- Reader Details ----");
    println!("Reader ID: {}", reader.id);
    println!("Name: {}", reader.name);
    println!("Phone: {}", reader.phone);
    println!("Email: {}", reader.email);
    println!("Address: {}", reader.address);
    println!("Registration Date: {}", reader.registered_at.format("%Y-%m-%d %H:%M"));
    println!("Total Books Issued: {}", reader.total_books_issued);
    if reader.pending_fine > 0 {
        println!("Pending Fine: {}", reader.pending_fine);
    }

    let current = library.open_loans_for(phone);
    if !current.is_empty() {
        println!("\n---- Currently Issued Books ({}) ----", current.len());
        for loan in &current {
            println!("* {} by {}", loan.book_title, loan.book_author);
            println!("  Issue Date: {}", loan.issued_at.format("%Y-%m-%d %H:%M"));
            println!("  Expected Return: {}", loan.due_at.format("%Y-%m-%d %H:%M"));
            print_loan_timing(loan, now);
        }
    }

    let history = library.loans_for(phone);
    if !history.is_empty() {
        println!("\n---- Book History ({} total) ----", history.len());
        // Last five entries, newest last.
        for loan in history.iter().rev().take(5).rev() {
            println!("* {} - {}", loan.book_title, loan.status.to_string().to_uppercase());
            println!("  Issue Date: {}", loan.issued_at.format("%Y-%m-%d %H:%M"));
            if let Some(returned) = loan.returned_at {
                println!("  Return Date: {}", returned.format("%Y-%m-%d %H:%M"));
            }
            if loan.fine_amount > 0 {
                println!("  Fine: {}", loan.fine_amount);
            }
        }
    }
}

/// Every loan still out, across all readers.
pub fn print_all_issued(library: &Library, now: DateTime<Utc>) {
    let open = library.all_open_loans();
    if open.is_empty() {
        println!("No books currently issued");
        return;
    }

    println!("Total Issued Books: {}\n", open.len());
    for loan in open {
        println!("Book: {}", loan.book_title);
        println!("Reader: {} ({})", loan.reader_name, loan.reader_phone);
        println!("Issue Date: {}", loan.issued_at.format("%Y-%m-%d %H:%M"));
        println!("Expected Return: {}", loan.due_at.format("%Y-%m-%d %H:%M"));
        print_loan_timing(loan, now);
        println!("{}", &RULE[..50]);
    }
}

/// The reader's payment history, newest first, with a running total.
pub fn print_payment_history(library: &Library, phone: &str) {
    let mut payments = library.payments_for(phone);
    if payments.is_empty() {
        println!("No payment history found.");
        return;
    }
    payments.sort_by_key(|p| std::cmp::Reverse(p.paid_at));

    println!("{RULE}");
    let mut total: Money = 0;
    for payment in &payments {
        println!("Payment ID: {}", payment.payment_id);
        println!("Date: {}", payment.paid_at.format("%Y-%m-%d"));
        println!("Type: {}", payment.purpose);
        println!("Amount: {}", payment.amount);
        println!("Method: {}", payment.method);
        println!("Status: {}", payment.status);
        println!("Description: {}", payment.description);
        println!("{RULE}");
        total += payment.amount;
    }
    println!("Total Amount Paid: {total}");
}

/// The fixed plan table shown before a membership purchase.
pub fn print_plan_table() {
    println!("\nAvailable Membership Plans:");
    println!("{}", &RULE[..60]);
    for plan in MembershipPlan::ALL {
        println!("{plan}");
        println!("  Fee: {}", plan.fee());
        println!("  Duration: {} months", plan.duration_months());
        println!("  Book Limit: {} book(s)", plan.book_limit());
        println!("  Discount: {}%", plan.discount_percent());
        println!("{}", &RULE[..60]);
    }
}
