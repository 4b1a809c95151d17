//! CLI walkthrough of the EVM envelope lifecycle.
//!
//! Builds a transfer, signs it for a chain, ships it as RLP, decodes it,
//! recovers the sender, and then shows the same signature being refused on
//! another chain. Set `RUST_LOG=nova_evm=debug` to see the library's own
//! events alongside the output.
//!
//! Run with:
//!   cargo run --example demo

use num_bigint::BigInt;

use nova_evm::config::{chain_name, ChainConfig, CHAIN_ID_MAINNET};
use nova_evm::crypto::{generate_address, EthKeypair};
use nova_evm::logging::{init_logging, LogFormat};
use nova_evm::transaction::{LedgerMsg, Msg, MsgEthereumTx, TxResult};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]==================================={RESET}");
    println!("{BOLD}  {title}{RESET}");
}

fn info(label: &str, value: impl std::fmt::Display) {
    println!("  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn main() -> TxResult<()> {
    init_logging("info", LogFormat::Pretty);

    let chain = ChainConfig::devnet();
    let alice = EthKeypair::generate();
    let bob = generate_address();

    section(1, "Build");
    let mut msg = MsgEthereumTx::new(
        0,
        Some(bob),
        Some(BigInt::from(1_000_000_000_000_000_000u64)),
        21_000,
        Some(BigInt::from(1_000_000_000u64)),
        Vec::new(),
    );
    let host_msg = LedgerMsg::from(msg.clone());
    host_msg.validate_basic()?;
    info("route", host_msg.route());
    info("type", host_msg.msg_type());
    info("max cost (wei)", msg.cost());

    section(2, "Sign");
    msg.sign(chain.chain_id, &alice)?;
    info("chain", format!("{} ({})", chain.chain_id, chain.name));
    info("signer", alice.address());
    info("v", msg.data.v().map(ToString::to_string).unwrap_or_default());
    info("tx hash", msg.hash()?);

    section(3, "Relay");
    let wire = msg.rlp_bytes()?;
    info("wire bytes", wire.len());
    println!("  {DIM}0x{}{RESET}", hex::encode(&wire));
    let received = MsgEthereumTx::decode_rlp(&wire)?;

    section(4, "Verify");
    let sender = received.verify_signature(chain.chain_id)?;
    println!("{GREEN}  [OK] sender {sender} recovered on {}{RESET}", chain.name);

    match received.verify_signature(CHAIN_ID_MAINNET) {
        Ok(other) => println!("{RED}  [!!] replay accepted, recovered {other}{RESET}"),
        Err(e) => println!(
            "{GREEN}  [OK] replay on {} refused: {e}{RESET}",
            chain_name(CHAIN_ID_MAINNET)
        ),
    }

    Ok(())
}
