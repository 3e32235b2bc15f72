use mychain_client::TransactionBuilder;
use mychain_types::{ChainMessage, ValidationError};
use proptest::prelude::*;

const ALICE: &str = "mychain19rl4cm2hmr8afy4kldpxz3fka4jguq0asw70kh";
const BOB: &str = "mychain1jrkmdcwgq94uaamx6zax2luewlhf7u4ksk4rlq";

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 @._-]{1,40}"
}

fn amount() -> impl Strategy<Value = String> {
    "[0-9]{1,40}"
}

/// Required fields of each action, in argument order. The explicit denom
/// counts as required once a caller passes `Some`.
const REQUIRED: [&[&str]; 4] = [
    &["creator", "name", "email"],
    &["sender", "receiver", "amount", "denom"],
    &["minter", "amount", "denom"],
    &["miner", "description", "commission"],
];

fn valid_args(action: usize, text: &str) -> Vec<String> {
    let args = match action {
        0 => vec![ALICE, text, text],
        1 => vec![ALICE, BOB, "100", "mychain"],
        2 => vec![ALICE, "100", "umychain"],
        _ => vec![ALICE, text, "0.5"],
    };
    args.into_iter().map(String::from).collect()
}

fn build(action: usize, args: &[String]) -> Result<ChainMessage, ValidationError> {
    let b = TransactionBuilder::default();
    match action {
        0 => b.create_user(&args[0], &args[1], &args[2]),
        1 => b.transfer_tokens(&args[0], &args[1], &args[2], Some(&args[3])),
        2 => b.mint_tokens(&args[0], &args[1], Some(&args[2])),
        _ => b.register_miner(&args[0], &args[1], &args[2]),
    }
}

proptest! {
    #[test]
    fn valid_actions_get_their_type_url(
        name in text(),
        email in text(),
        value in amount(),
        description in text(),
        commission in "0\\.[0-9]{1,18}",
    ) {
        let b = TransactionBuilder::default();
        let cases = [
            (b.create_user(ALICE, &name, &email), "MsgCreateUser"),
            (b.transfer_tokens(ALICE, BOB, &value, None), "MsgTransferTokens"),
            (b.mint_tokens(ALICE, &value, None), "MsgMintTokens"),
            (b.register_miner(ALICE, &description, &commission), "MsgRegisterMiner"),
        ];
        for (built, suffix) in cases {
            let msg = built.unwrap();
            let url = msg.type_url();
            let envelope = msg.to_envelope();
            prop_assert_eq!(&url, &format!("/mychain.mychain.{suffix}"));
            prop_assert_eq!(envelope["typeUrl"].as_str(), Some(url.as_str()));
        }
    }

    #[test]
    fn any_empty_required_field_is_named(
        (action, field) in (0..REQUIRED.len()).prop_flat_map(|a| (Just(a), 0..REQUIRED[a].len())),
        value in text(),
    ) {
        let mut args = valid_args(action, &value);
        prop_assert!(build(action, &args).is_ok());

        args[field].clear();
        prop_assert_eq!(
            build(action, &args).unwrap_err(),
            ValidationError::EmptyField { field: REQUIRED[action][field] }
        );
    }

    #[test]
    fn non_digit_amounts_are_rejected(value in "[0-9]{0,5}[^0-9][0-9]{0,5}") {
        let b = TransactionBuilder::default();
        prop_assert_eq!(
            b.mint_tokens(ALICE, &value, None).unwrap_err(),
            ValidationError::InvalidAmount { value: value.clone() }
        );
    }

    #[test]
    fn commission_above_one_is_rejected(int in 2u64..1_000_000, frac in "[0-9]{0,6}") {
        let commission = if frac.is_empty() { int.to_string() } else { format!("{int}.{frac}") };
        let err = TransactionBuilder::default()
            .register_miner(ALICE, "rig", &commission)
            .unwrap_err();
        prop_assert_eq!(err, ValidationError::InvalidCommission { value: commission });
    }
}
