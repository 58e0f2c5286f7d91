//! Reads a password from stdin and prints an Argon2id hash suitable for the
//! `password_hash` column of `students` or `instructors`.

use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    eprint!("Enter password: ");
    io::stderr().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let hash = gradebook_core::hash_password(password)?;
    println!("{hash}");
    Ok(())
}
