use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{OffsetDateTime, macros::date};

use finance_tracker::{
    CategoryName, NewTransaction, PasswordHash, TransactionType, create_category,
    create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test@example.com' with the password 'test'...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;
    let user = create_user(
        "test",
        EmailAddress::from_str("test@example.com")?,
        password_hash,
        &conn,
    )?;

    println!("Creating categories...");

    let mut category_ids = Vec::new();
    for (name, category_type) in [
        ("Salary", TransactionType::Income),
        ("Groceries", TransactionType::Expense),
        ("Rent", TransactionType::Expense),
    ] {
        let category = create_category(
            user.id,
            CategoryName::new(name)?,
            category_type,
            &conn,
        )?;
        category_ids.push(category.id);
    }

    println!("Creating transactions...");

    let transactions = [
        (3200.0, TransactionType::Income, "Pay", date!(2024 - 01 - 15), Some(category_ids[0])),
        (1400.0, TransactionType::Expense, "Rent", date!(2024 - 01 - 16), Some(category_ids[2])),
        (86.4, TransactionType::Expense, "Supermarket", date!(2024 - 01 - 20), Some(category_ids[1])),
        (3200.0, TransactionType::Income, "Pay", date!(2024 - 02 - 15), Some(category_ids[0])),
        (1400.0, TransactionType::Expense, "Rent", date!(2024 - 02 - 16), Some(category_ids[2])),
        (23.0, TransactionType::Expense, "Parking", date!(2024 - 02 - 18), None),
    ];

    for (amount, transaction_type, description, transaction_date, category_id) in transactions {
        create_transaction(
            user.id,
            &NewTransaction {
                amount,
                transaction_type,
                description: Some(description.to_owned()),
                transaction_date,
                category_id,
            },
            OffsetDateTime::now_utc(),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
