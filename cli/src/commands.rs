//! Subcommands. Each returns the text printed on stdout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Subcommand;
use mychain_client::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, ClientConfig,
    IdentityProvider, TransactionBuilder,
};
use mychain_crypto::{decode_bech32, HdDerivation, KeyDerivation};
use mychain_types::{is_valid_address, ChainMessage, ADDRESS_HRP, ADDRESS_LEN, ADDRESS_PREFIX};
use tracing::info;
use zeroize::Zeroizing;

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Generate a fresh secret phrase.
    Mnemonic {
        /// Number of words: 12, 15, 18, 21 or 24.
        #[arg(long, default_value_t = 12)]
        words: usize,

        /// Encrypt the phrase into this keystore file instead of printing it.
        #[arg(long)]
        save: Option<PathBuf>,

        /// Keystore password.
        #[arg(long, env = "MYCHAIN_KEYSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print the addresses derived from a secret phrase or keystore.
    Address {
        /// The secret phrase.
        #[arg(long, env = "MYCHAIN_MNEMONIC", hide_env_values = true, conflicts_with = "keystore")]
        mnemonic: Option<String>,

        /// Keystore file holding the phrase.
        #[arg(long)]
        keystore: Option<PathBuf>,

        /// Keystore password.
        #[arg(long, env = "MYCHAIN_KEYSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Number of accounts to list; defaults to the config's `account_count`.
        #[arg(long)]
        accounts: Option<u32>,
    },

    /// Check an address's shape and bech32 checksum.
    Validate { address: String },

    /// Print the envelope of a message without broadcasting it.
    Build {
        #[command(subcommand)]
        action: BuildAction,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum BuildAction {
    /// MsgCreateUser
    CreateUser {
        #[arg(long)]
        creator: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// MsgTransferTokens
    Transfer {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        denom: Option<String>,
    },
    /// MsgMintTokens
    Mint {
        #[arg(long)]
        minter: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        denom: Option<String>,
    },
    /// MsgRegisterMiner
    RegisterMiner {
        #[arg(long)]
        miner: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        commission: String,
    },
}

pub(crate) fn run(command: Command, config: &ClientConfig) -> anyhow::Result<String> {
    match command {
        Command::Mnemonic {
            words,
            save,
            password,
        } => mnemonic(words, save.as_deref(), password.as_deref()),
        Command::Address {
            mnemonic,
            keystore,
            password,
            accounts,
        } => {
            let phrase = read_phrase(mnemonic, keystore.as_deref(), password.as_deref())?;
            addresses(&phrase, accounts.unwrap_or(config.account_count))
        }
        Command::Validate { address } => validate(&address),
        Command::Build { action } => {
            let msg = build(action, &TransactionBuilder::new(config.denom.clone()))?;
            Ok(serde_json::to_string_pretty(&msg.to_envelope())?)
        }
    }
}

/// The phrase given directly or decrypted from a keystore, wiped on drop.
fn read_phrase(
    mnemonic: Option<String>,
    keystore: Option<&Path>,
    password: Option<&str>,
) -> anyhow::Result<Zeroizing<String>> {
    match (mnemonic, keystore) {
        (Some(phrase), _) => Ok(Zeroizing::new(phrase)),
        (None, Some(path)) => {
            let password = password.context("--password is required with --keystore")?;
            let keystore = load_keystore(path)
                .with_context(|| format!("reading keystore {}", path.display()))?;
            Ok(decrypt_keystore(&keystore, password)?)
        }
        (None, None) => bail!("pass --mnemonic or --keystore"),
    }
}

fn mnemonic(words: usize, save: Option<&Path>, password: Option<&str>) -> anyhow::Result<String> {
    let identities = IdentityProvider::new(HdDerivation::default());
    let phrase = Zeroizing::new(identities.derivation().generate_secret(words, ADDRESS_HRP)?);
    let Some(path) = save else {
        return Ok(phrase.to_string());
    };

    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => bail!("a non-empty --password (or MYCHAIN_KEYSTORE_PASSWORD) is required with --save"),
    };
    let address = identities.primary_address(&identities.from_secret(&phrase, ADDRESS_HRP)?)?;
    save_keystore(&encrypt_keystore(&phrase, password)?, path)
        .with_context(|| format!("writing keystore {}", path.display()))?;
    info!(path = %path.display(), %address, "keystore saved");
    Ok(format!("{address}\nsaved to {}", path.display()))
}

fn addresses(phrase: &str, accounts: u32) -> anyhow::Result<String> {
    let identities = IdentityProvider::new(HdDerivation::new(accounts));
    let identity = identities.from_secret(phrase, ADDRESS_HRP)?;
    let lines: Vec<String> = identity
        .accounts()
        .iter()
        .enumerate()
        .map(|(i, account)| format!("{i}: {}", account.address))
        .collect();
    Ok(lines.join("\n"))
}

fn validate(address: &str) -> anyhow::Result<String> {
    if !is_valid_address(address) {
        bail!(
            "{address:?} is not a {ADDRESS_LEN}-character address starting with {ADDRESS_PREFIX}"
        );
    }
    match decode_bech32(address) {
        Some((_, id)) => Ok(format!("valid (account id {})", hex::encode(id))),
        None => bail!("{address:?} has the right shape but fails the bech32 checksum"),
    }
}

fn build(action: BuildAction, builder: &TransactionBuilder) -> anyhow::Result<ChainMessage> {
    let msg = match action {
        BuildAction::CreateUser {
            creator,
            name,
            email,
        } => builder.create_user(&creator, &name, &email)?,
        BuildAction::Transfer {
            sender,
            receiver,
            amount,
            denom,
        } => builder.transfer_tokens(&sender, &receiver, &amount, denom.as_deref())?,
        BuildAction::Mint {
            minter,
            amount,
            denom,
        } => builder.mint_tokens(&minter, &amount, denom.as_deref())?,
        BuildAction::RegisterMiner {
            miner,
            description,
            commission,
        } => builder.register_miner(&miner, &description, &commission)?,
    };
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";
    const ALICE: &str = "mychain19rl4cm2hmr8afy4kldpxz3fka4jguq0asw70kh";
    const BOB: &str = "mychain1jrkmdcwgq94uaamx6zax2luewlhf7u4ksk4rlq";

    #[test]
    fn addresses_lists_accounts_in_order() {
        let out = addresses(ABANDON, 2).unwrap();
        assert_eq!(out, format!("0: {ALICE}\n1: {BOB}"));
    }

    #[test]
    fn validate_reports_account_id() {
        let out = validate("mychain1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn0czgcm").unwrap();
        assert_eq!(out, "valid (account id 000102030405060708090a0b0c0d0e0f10111213)");
    }

    #[test]
    fn validate_rejects_bad_checksum_and_shape() {
        assert!(validate("mychain1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn0czgcq").is_err());
        assert!(validate("cosmos1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn0czgcm").is_err());
        assert!(validate("").is_err());
    }

    #[test]
    fn build_prints_transfer_envelope() {
        let out = run(
            Command::Build {
                action: BuildAction::Transfer {
                    sender: ALICE.into(),
                    receiver: BOB.into(),
                    amount: "100".into(),
                    denom: None,
                },
            },
            &ClientConfig::default(),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["typeUrl"], "/mychain.mychain.MsgTransferTokens");
        assert_eq!(json["value"]["amount"][0]["denom"], "mychain");
    }

    #[test]
    fn build_rejects_invalid_commission() {
        let err = run(
            Command::Build {
                action: BuildAction::RegisterMiner {
                    miner: ALICE.into(),
                    description: "rig".into(),
                    commission: "1.5".into(),
                },
            },
            &ClientConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("commission"));
    }

    #[test]
    fn mnemonic_prints_phrase() {
        let phrase = mnemonic(24, None, None).unwrap();
        assert_eq!(phrase.split_whitespace().count(), 24);
    }

    #[test]
    fn mnemonic_save_requires_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        assert!(mnemonic(12, Some(&path), None).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn keystore_phrase_stays_zeroizing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        save_keystore(&encrypt_keystore(ABANDON, "pw").unwrap(), &path).unwrap();

        let phrase: Zeroizing<String> = read_phrase(None, Some(&path), Some("pw")).unwrap();
        assert_eq!(phrase.as_str(), ABANDON);
        assert!(read_phrase(None, Some(&path), None).is_err());
        assert!(read_phrase(None, None, None).is_err());
    }

    #[test]
    fn saved_keystore_yields_same_address() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        let out = mnemonic(12, Some(&path), Some("hunter2")).unwrap();
        let saved_address = out.lines().next().unwrap().to_string();

        let listed = run(
            Command::Address {
                mnemonic: None,
                keystore: Some(path),
                password: Some("hunter2".into()),
                accounts: Some(1),
            },
            &ClientConfig::default(),
        )
        .unwrap();
        assert_eq!(listed, format!("0: {saved_address}"));
    }
}
