//! Prints the Argon2 hash of a password for seeding `admin_profile.password_hash`.
//!
//! Usage: `hash_password <password>` or `echo -n secret | hash_password`.

use std::io::{self, BufRead};

use anyhow::bail;
use blog_backend::utils::password::hash_password;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        bail!("password must not be empty");
    }

    println!("{}", hash_password(&password)?);
    Ok(())
}
