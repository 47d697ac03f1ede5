//! services/cli/src/menu/mod.rs
//!
//! The interactive command loop. Each command gathers validated input,
//! runs one core operation, and persists the whole snapshot only after
//! that operation succeeded. Rejected operations are printed and the
//! loop keeps running.

pub mod input;
pub mod payment;
pub mod reports;

use tracing::info;

use library_core::{
    BookPatch, BookSpec, Clock, Library, LibraryError, MembershipPlan, Reader, ReaderSpec,
    SearchField, StateStore, DAILY_FINE_RATE,
};

use crate::adapters::{GeneratedIds, JsonStore, SystemClock};
use crate::error::CliError;
use crate::menu::input::{
    read_choice, read_number, read_optional, read_optional_number, read_phone, read_text,
    read_yes_no,
};
use crate::menu::input::prompt;

/// The running application: the in-memory library plus its adapters.
pub struct App {
    library: Library,
    store: JsonStore,
    clock: SystemClock,
    ids: GeneratedIds,
}

fn display_menu() {
    println!("\n{}", "=".repeat(50));
    println!("         LIBRARY MANAGEMENT SYSTEM");
    println!("{}", "=".repeat(50));
    println!("1.  Search Book");
    println!("2.  Issue Book");
    println!("3.  Add a New Book");
    println!("4.  Update Book");
    println!("5.  Delete Book");
    println!("6.  Return Book");
    println!("7.  View Readers Profile");
    println!("8.  View All Issued Books");
    println!("9.  Purchase Book");
    println!("10. Purchase Membership");
    println!("11. View Payment History");
    println!("12. Exit");
    println!("{}", "=".repeat(50));
}

impl App {
    pub fn new(library: Library, store: JsonStore) -> Self {
        Self { library, store, clock: SystemClock, ids: GeneratedIds }
    }

    /// Runs the menu until the operator exits.
    pub fn run(&mut self) -> Result<(), CliError> {
        println!("Welcome to Library Management System!");
        loop {
            display_menu();
            let choice = read_choice("Enter your choice (1-12): ", 1, 12)?;
            if choice == 12 {
                println!("Thank you for using Library Management System!");
                return Ok(());
            }

            let result = match choice {
                1 => self.search_books(),
                2 => self.issue_book(),
                3 => self.add_books(),
                4 => self.update_book(),
                5 => self.delete_book(),
                6 => self.return_book(),
                7 => self.reader_profile(),
                8 => self.all_issued_books(),
                9 => self.purchase_book(),
                10 => self.purchase_membership(),
                11 => self.payment_history(),
                _ => Ok(()),
            };
            match result {
                Ok(()) => {}
                // Rejected operations left state untouched; report and go on.
                Err(CliError::Library(e)) => println!("{e}"),
                Err(other) => return Err(other),
            }
        }
    }

    fn persist(&self) -> Result<(), CliError> {
        self.store.save(&self.library)?;
        Ok(())
    }

    /// Looks the reader up by phone, registering them on first contact.
    fn handle_reader(&mut self) -> Result<Reader, CliError> {
        println!("\n--- Reader Information ---");
        let phone = read_phone()?;

        if let Some(reader) = self.library.reader_by_phone(&phone) {
            println!("\nWelcome back, {}!", reader.name);
            return Ok(reader.clone());
        }

        println!("New customer! Let's register you.");
        let spec = ReaderSpec {
            name: read_text("Enter your name: ")?,
            phone,
            email: read_optional("Enter email (optional): ")?,
            address: read_optional("Enter address (optional): ")?,
        };
        let reader = self.library.register_reader(spec, &self.ids, self.clock.now())?;
        self.persist()?;
        info!(reader_id = %reader.id, "reader registered");
        println!("\nReader {} registered successfully! Reader ID: {}", reader.name, reader.id);
        Ok(reader)
    }

    /// Quotes the reader's full fine balance and, if confirmed, settles
    /// it in one payment. Returns whether anything was collected.
    fn settle_flow(&mut self, phone: &str) -> Result<bool, CliError> {
        let now = self.clock.now();
        let total = self.library.pending_fine_for(phone, now);
        if total == 0 {
            println!("No pending fine to pay!");
            return Ok(false);
        }

        println!("Total Pending Fine: {total}");
        let overdue = self.library.overdue_loans(phone, now);
        if !overdue.is_empty() {
            println!("\nOverdue Books:");
            for line in &overdue {
                println!(
                    "* {}: {} days overdue - {}",
                    line.book_title, line.overdue_days, line.outstanding
                );
            }
        }

        if !read_yes_no(&format!("Pay fine of {total}? (y/n): "))? {
            return Ok(false);
        }
        let method = payment::choose_method()?;
        // Settlement prices against its own single instant.
        let settlement =
            self.library.settle_fines(phone, method, &self.ids, self.clock.now())?;
        self.persist()?;
        info!(amount = settlement.total, "fine settled");
        println!("\nPayment Successful!");
        println!("Payment ID: {}", settlement.payment.payment_id);
        println!("Transaction Reference: {}", settlement.payment.transaction_ref);
        println!("Fine paid successfully!");
        Ok(true)
    }

    fn search_books(&self) -> Result<(), CliError> {
        println!("\n---- SEARCH BOOK ----");
        println!("Search By:");
        println!("1. Title");
        println!("2. Author");
        println!("3. Genre");
        println!("4. Language");
        let field = match read_choice("Enter choice (1-4): ", 1, 4)? {
            1 => SearchField::Title,
            2 => SearchField::Author,
            3 => SearchField::Genre,
            _ => SearchField::Language,
        };
        let term = read_text("Enter search term: ")?;
        reports::print_books(&self.library.find_books(field, &term));
        Ok(())
    }

    fn issue_book(&mut self) -> Result<(), CliError> {
        println!("\n---- ISSUE BOOK ----");
        let reader = self.handle_reader()?;

        if reader.pending_fine > 0 {
            println!("You have pending fine of {}", reader.pending_fine);
            if read_yes_no("Pay fine now to continue? (y/n): ")? {
                self.settle_flow(&reader.phone)?;
            } else {
                println!("Please clear pending fine to issue new books.");
                return Ok(());
            }
        }

        let title = read_text("\nEnter the book name to issue: ")?;
        let loan = self.library.issue_book(&reader.phone, &title, &self.ids, self.clock.now())?;
        self.persist()?;
        info!(issue_id = %loan.issue_id, title = %loan.book_title, "book issued");

        println!("\nBook '{}' issued successfully!", loan.book_title);
        println!("Issue ID: {}", loan.issue_id);
        println!("Expected Return Date: {}", loan.due_at.format("%Y-%m-%d"));
        if let Some(m) = self.library.active_membership_for(&reader.phone, self.clock.now()) {
            let used = self.library.open_loans_for(&reader.phone).len();
            println!("Membership: {} ({}/{} books used)", m.plan, used, m.book_limit);
        }
        Ok(())
    }

    fn add_books(&mut self) -> Result<(), CliError> {
        println!("\n---- ADD NEW BOOKS ----");
        let count: u32 = read_number("How many books do you want to add in library: ")?;

        for i in 1..=count {
            println!("\nAdding book {i} of {count}...");
            let spec = BookSpec {
                title: read_text("Enter book title: ")?,
                author: read_text("Enter author name: ")?,
                year: read_number("Enter publication year: ")?,
                genre: read_text("Enter genre: ")?,
                pages: read_number("Enter number of pages: ")?,
                rating: read_number("Enter rating (0-5): ")?,
                language: read_text("Enter language: ")?,
                stock: read_number("Enter stock quantity: ")?,
                price: read_number("Enter price: ")?,
            };
            match self.library.add_book(spec, &self.ids) {
                Ok(book) => {
                    self.persist()?;
                    info!(id = book.id, title = %book.title, "book added");
                    println!("Book '{}' added successfully with ID: {}", book.title, book.id);
                }
                Err(e @ LibraryError::DuplicateTitle(_)) => println!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn update_book(&mut self) -> Result<(), CliError> {
        println!("\n--- UPDATE BOOK ---");
        let title = read_text("Enter the book title: ")?;
        let Some(book) = self.library.match_book(&title).cloned() else {
            println!("Book '{title}' not found");
            return Ok(());
        };

        println!("\nCurrent details for '{}':", book.title);
        reports::print_book_details(&book);

        println!("\nEnter new values (press Enter to keep current value):");
        let patch = BookPatch {
            title: non_empty(read_optional(&format!("title [{}]: ", book.title))?),
            author: non_empty(read_optional(&format!("author [{}]: ", book.author))?),
            year: read_optional_number(&format!("year [{}]: ", book.year))?,
            genre: non_empty(read_optional(&format!("genre [{}]: ", book.genre))?),
            pages: read_optional_number(&format!("pages [{}]: ", book.pages))?,
            isbn: non_empty(read_optional(&format!("isbn [{}]: ", book.isbn))?),
            rating: read_optional_number(&format!("rating [{}]: ", book.rating))?,
            language: non_empty(read_optional(&format!("language [{}]: ", book.language))?),
            stock: read_optional_number(&format!("stock [{}]: ", book.stock))?,
            price: read_optional_number(&format!("price [{}]: ", book.price))?,
        };

        let updated = self.library.update_book(&title, patch)?;
        self.persist()?;
        info!(id = updated.id, "book updated");
        println!("Book '{}' updated successfully!", updated.title);
        Ok(())
    }

    fn delete_book(&mut self) -> Result<(), CliError> {
        println!("\n---- DELETE BOOK ----");
        let title = read_text("Enter book title to delete from library: ")?;
        let Some(book) = self.library.match_book(&title).cloned() else {
            println!("Book '{title}' not found!");
            return Ok(());
        };

        if !read_yes_no(&format!("Are you sure you want to delete '{}'? (y/n): ", book.title))? {
            println!("Book deletion cancelled");
            return Ok(());
        }
        let removed = self.library.remove_book(&title)?;
        self.persist()?;
        info!(id = removed.id, title = %removed.title, "book deleted");
        println!("Book '{}' deleted successfully!", removed.title);
        Ok(())
    }

    fn return_book(&mut self) -> Result<(), CliError> {
        println!("\n---- RETURN BOOK ----");
        let phone = read_phone()?;
        let now = self.clock.now();

        let open: Vec<_> =
            self.library.open_loans_for(&phone).into_iter().cloned().collect();
        if open.is_empty() {
            println!("No books currently issued to this reader");
            return Ok(());
        }

        println!("\nBooks issued to reader:");
        for (i, loan) in open.iter().enumerate() {
            println!("{}. {}", i + 1, loan.book_title);
            println!("   Issue Date: {}", loan.issued_at.format("%Y-%m-%d"));
            println!("   Expected Return Date: {}", loan.due_at.format("%Y-%m-%d"));
            println!("   Days Held: {}", (now - loan.issued_at).num_days());
            let overdue = loan.overdue_days(now);
            if overdue > 0 {
                println!("   OVERDUE by {overdue} days - Fine: {}", overdue * DAILY_FINE_RATE);
            }
            println!();
        }

        let choice = read_choice("Enter book number to return: ", 1, open.len() as u32)?;
        let issue_id = open[(choice - 1) as usize].issue_id.clone();

        let returned = self.library.return_book(&issue_id, self.clock.now())?;
        self.persist()?;
        info!(issue_id = %returned.issue_id, fine = returned.fine_amount, "book returned");

        println!("\nBook '{}' returned successfully!", returned.book_title);
        if returned.fine_amount > 0 {
            println!("Fine assessed: {}", returned.fine_amount);
            if read_yes_no("Pay pending fine now? (y/n): ")? {
                self.settle_flow(&phone)?;
            }
        }
        Ok(())
    }

    fn reader_profile(&self) -> Result<(), CliError> {
        println!("\n---- READER PROFILE ----");
        let phone = read_phone()?;
        reports::print_reader_profile(&self.library, &phone, self.clock.now());
        Ok(())
    }

    fn all_issued_books(&self) -> Result<(), CliError> {
        println!("\n---- ALL ISSUED BOOKS ----");
        reports::print_all_issued(&self.library, self.clock.now());
        Ok(())
    }

    fn purchase_book(&mut self) -> Result<(), CliError> {
        println!("\n---- PURCHASE BOOK ----");
        let reader = self.handle_reader()?;

        let title = read_text("Enter the book name to purchase: ")?;
        let Some(book) = self.library.match_book(&title).cloned() else {
            println!("Book '{title}' not found in library");
            return Ok(());
        };

        let discount = self
            .library
            .active_membership_for(&reader.phone, self.clock.now())
            .map(|m| (m.plan, m.discount_percent));
        let percent = discount.as_ref().map_or(0, |(_, d)| *d);
        let quoted = book.price - book.price * i64::from(percent) / 100;

        println!("\nBook Details:");
        println!("Title: {}", book.title);
        println!("Author: {}", book.author);
        println!("Original Price: {}", book.price);
        if let Some((plan, d)) = discount {
            if d > 0 {
                println!("Membership Discount ({plan}): {d}%");
                println!("Final Price: {quoted}");
            }
        }

        if !read_yes_no(&format!("Confirm purchase for {quoted}? (y/n): "))? {
            return Ok(());
        }
        let method = payment::choose_method()?;
        let purchase =
            self.library.purchase_book(&reader.phone, &title, method, &self.ids, self.clock.now())?;
        self.persist()?;
        info!(title = %purchase.book_title, amount = purchase.final_price, "book purchased");

        println!("\nPayment Successful!");
        println!("Payment ID: {}", purchase.payment.payment_id);
        println!("Transaction Reference: {}", purchase.payment.transaction_ref);
        println!("\nBook '{}' purchased successfully!", purchase.book_title);
        println!("Thank you for your purchase!");
        Ok(())
    }

    fn purchase_membership(&mut self) -> Result<(), CliError> {
        println!("\n---- PURCHASE MEMBERSHIP ----");
        let reader = self.handle_reader()?;

        if let Some(active) = self.library.active_membership_for(&reader.phone, self.clock.now()) {
            println!("You already have an active {} membership", active.plan);
            println!("Expires on: {}", active.expires_at.format("%Y-%m-%d"));
            if !read_yes_no("Do you want to upgrade/renew? (y/n): ")? {
                return Ok(());
            }
        }

        reports::print_plan_table();
        let plan: MembershipPlan =
            prompt("Enter membership plan (Basic/Premium/VIP): ")?.parse()?;
        println!("\nAmount to Pay: {}", plan.fee());
        let method = payment::choose_method()?;

        let (membership, fee_payment) = self.library.purchase_membership(
            &reader.phone,
            plan,
            method,
            &self.ids,
            self.clock.now(),
        )?;
        self.persist()?;
        info!(plan = %membership.plan, membership_id = %membership.id, "membership purchased");

        println!("\nPayment Successful!");
        println!("Payment ID: {}", fee_payment.payment_id);
        println!("Transaction Reference: {}", fee_payment.transaction_ref);
        println!("\n{} Membership activated successfully!", membership.plan);
        println!("Membership ID: {}", membership.id);
        println!("Valid till: {}", membership.expires_at.format("%Y-%m-%d"));
        Ok(())
    }

    fn payment_history(&mut self) -> Result<(), CliError> {
        println!("\n---- PAYMENT HISTORY ----");
        let reader = self.handle_reader()?;
        println!("\nPayment History for {}:", reader.name);
        reports::print_payment_history(&self.library, &reader.phone);
        Ok(())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
