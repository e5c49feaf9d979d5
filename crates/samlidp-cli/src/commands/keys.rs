//! Key management commands.
//!
//! `samlidp keys generate` - Generate a new tracked-request signing key.

use samlidp_tracker::KeyPair;
use std::fs;
use std::path::PathBuf;

/// Generate a new RSA keypair.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate()?;

    if let Some(output_dir) = output {
        fs::create_dir_all(&output_dir)?;

        let private_path = output_dir.join("tracker.pem");
        let public_path = output_dir.join("tracker.pub.pem");
        keypair.save_to_files(&private_path, &public_path)?;

        println!("✔ Generated tracker keypair:");
        println!("  Private key: {}", private_path.display());
        println!("  Public key:  {}", public_path.display());
        println!();
        println!("⚠️  Keep your private key secure! Never commit it to version control.");
        println!();
        println!("Reference it from samlidp.toml:");
        println!("  [tracker]");
        println!("  private_key_file = \"{}\"", private_path.display());
    } else {
        println!("{}", keypair.private_key_pem()?);
        println!("{}", keypair.public_key_pem());
        println!("Use --output <dir> to save keys to files.");
    }

    Ok(())
}
