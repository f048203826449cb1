use std::env;

use tabled::Table;

use crate::{config, error, success};

/// Prints which configuration variables are set, masking secrets.
pub fn check() {
    let (rows, all_good) = config::env_report(|key| env::var(key).ok());
    println!("{}", Table::new(rows));

    if all_good {
        success!("All required environment variables are configured.");
    } else {
        error!(
            "Some required environment variables are missing. Set them in the environment or in {}",
            config::data_dir().join(".env").display()
        );
    }
}
