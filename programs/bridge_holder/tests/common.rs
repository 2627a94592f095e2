#![allow(dead_code)]
#![allow(deprecated)]

use borsh::BorshDeserialize;
use bridge_holder::{
    config::{pad_recipient, Configuration},
    derivation::{dispatched_message_address, gas_payment_address, holder_address},
    instruction,
    state::HolderState,
    transfer::{TransferRemotePayload, WARP_ROUTE_TRANSFER_REMOTE_PREFIX},
    HolderError,
};
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
    program_pack::Pack,
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::system_instruction;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

// ============================================================================
// TEST PROGRAM IDS AND CONSTANTS
// ============================================================================

/// Fixed program ID for testing. Actual deployed program ID is determined by
/// the deployment keypair, not this value.
pub fn test_program_id() -> Pubkey {
    solana_sdk::pubkey!("Ho1der1111111111111111111111111111111111111")
}

/// Mock warp route program ID (simulates the Hyperlane token program)
pub fn mock_warp_route_id() -> Pubkey {
    solana_sdk::pubkey!("MockWarp11111111111111111111111111111111111")
}

pub const DESTINATION_DOMAIN: u32 = 1;
pub const DECIMALS: u8 = 6;
pub const CUSTODY_BALANCE: u64 = 1_000_000;

/// 20-byte EVM recipient used by the default configuration.
pub const EVM_RECIPIENT: [u8; 20] = [
    0x0b, 0x0c, 0xa0, 0x9f, 0x3a, 0x7e, 0x51, 0x22, 0x6d, 0x11, 0x3b, 0x48, 0x90, 0x5e, 0x2c, 0x44,
    0x17, 0x2f, 0x86, 0xd1,
];

/// Recipient the mock warp route refuses, to exercise a failing downstream call.
pub const REJECTED_RECIPIENT: [u8; 32] = [0xff; 32];

// ============================================================================
// MOCK WARP ROUTE
// ============================================================================

/// Mock warp route processor.
/// Accepts only a well-formed `TransferRemote` carrying the 17 accounts the
/// real warp route expects, with the sender and unique message signing.
pub fn mock_warp_route_process(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if accounts.len() != 17 {
        msg!("MockWarpRoute: expected 17 accounts, got {}", accounts.len());
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    if instruction_data.len() < 9 || instruction_data[..9] != WARP_ROUTE_TRANSFER_REMOTE_PREFIX {
        return Err(ProgramError::InvalidInstructionData);
    }
    let payload = TransferRemotePayload::try_from_slice(&instruction_data[9..])
        .map_err(|_| ProgramError::InvalidInstructionData)?;

    if payload.recipient == REJECTED_RECIPIENT {
        msg!("MockWarpRoute: recipient rejected");
        return Err(ProgramError::InvalidArgument);
    }

    let sender = &accounts[6];
    let unique_message = &accounts[7];
    if !sender.is_signer || !unique_message.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (message_storage, _) = dispatched_message_address(accounts[3].key, unique_message.key);
    let (gas_payment, _) = gas_payment_address(accounts[9].key, unique_message.key);
    if *accounts[8].key != message_storage || *accounts[11].key != gas_payment {
        return Err(ProgramError::InvalidSeeds);
    }

    let mut amount = [0u8; 8];
    amount.copy_from_slice(&payload.amount_or_id[..8]);
    msg!(
        "MockWarpRoute: transfer_remote domain={}, recipient={}, amount={}",
        payload.destination_domain,
        hex::encode(payload.recipient),
        u64::from_le_bytes(amount)
    );
    Ok(())
}

// ============================================================================
// TEST HARNESS HELPERS
// ============================================================================

/// Helper: Build a ProgramTest instance with bridge_holder + spl_token + mock warp route
pub fn program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new(
        "bridge_holder",
        test_program_id(),
        processor!(bridge_holder::processor::Processor::process),
    );
    program_test.add_program(
        "spl_token",
        spl_token::id(),
        processor!(spl_token::processor::Processor::process),
    );
    program_test.add_program(
        "mock_warp_route",
        mock_warp_route_id(),
        processor!(mock_warp_route_process),
    );
    program_test.prefer_bpf(false);
    program_test
}

/// Helper: Send a transaction with a specific payer and signers
pub async fn send_tx(
    context: &mut ProgramTestContext,
    payer: &Keypair,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.banks_client.get_latest_blockhash().await?;
    let mut all_signers = Vec::with_capacity(signers.len() + 1);
    all_signers.push(payer);
    for signer in signers {
        if signer.pubkey() != payer.pubkey() {
            all_signers.push(*signer);
        }
    }

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

/// Helper: Assert a transaction failed with the given program error
pub fn assert_holder_error(result: Result<(), BanksClientError>, expected: HolderError) {
    let err = result.expect_err("transaction should have failed");
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
            assert_eq!(code, expected as u32, "expected {:?}", expected);
        }
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

/// Helper: Assert a transaction failed with the given runtime instruction error
pub fn assert_instruction_error(result: Result<(), BanksClientError>, expected: InstructionError) {
    let err = result.expect_err("transaction should have failed");
    match err.unwrap() {
        TransactionError::InstructionError(_, actual) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

// ============================================================================
// SPL TOKEN HELPERS
// ============================================================================

/// Helper: Create a new SPL token mint
pub async fn create_mint(
    context: &mut ProgramTestContext,
    payer: &Keypair,
    mint_authority: &Keypair,
    decimals: u8,
) -> Pubkey {
    let mint = Keypair::new();
    let rent = context.banks_client.get_rent().await.unwrap();
    let mint_rent = rent.minimum_balance(spl_token::state::Mint::LEN);

    let create_mint_ix = system_instruction::create_account(
        &payer.pubkey(),
        &mint.pubkey(),
        mint_rent,
        spl_token::state::Mint::LEN as u64,
        &spl_token::id(),
    );
    let init_mint_ix = spl_token::instruction::initialize_mint2(
        &spl_token::id(),
        &mint.pubkey(),
        &mint_authority.pubkey(),
        None,
        decimals,
    )
    .unwrap();

    send_tx(context, payer, &[create_mint_ix, init_mint_ix], &[&mint])
        .await
        .unwrap();
    mint.pubkey()
}

/// Helper: Create an SPL token account for a given mint and owner
pub async fn create_token_account(
    context: &mut ProgramTestContext,
    payer: &Keypair,
    mint: Pubkey,
    owner: Pubkey,
) -> Pubkey {
    let token_account = Keypair::new();
    let rent = context.banks_client.get_rent().await.unwrap();
    let token_rent = rent.minimum_balance(spl_token::state::Account::LEN);

    let create_ix = system_instruction::create_account(
        &payer.pubkey(),
        &token_account.pubkey(),
        token_rent,
        spl_token::state::Account::LEN as u64,
        &spl_token::id(),
    );
    let init_ix = spl_token::instruction::initialize_account3(
        &spl_token::id(),
        &token_account.pubkey(),
        &mint,
        &owner,
    )
    .unwrap();

    send_tx(context, payer, &[create_ix, init_ix], &[&token_account])
        .await
        .unwrap();
    token_account.pubkey()
}

/// Helper: Mint tokens to a token account
pub async fn mint_to(
    context: &mut ProgramTestContext,
    payer: &Keypair,
    mint: Pubkey,
    mint_authority: &Keypair,
    destination: Pubkey,
    amount: u64,
) {
    let ix = spl_token::instruction::mint_to(
        &spl_token::id(),
        &mint,
        &destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )
    .unwrap();

    send_tx(context, payer, &[ix], &[mint_authority]).await.unwrap();
}

/// Helper: Read SPL token account balance
pub async fn get_token_balance(context: &mut ProgramTestContext, token_account: Pubkey) -> u64 {
    let account = context
        .banks_client
        .get_account(token_account)
        .await
        .unwrap()
        .unwrap();
    let token_state = spl_token::state::Account::unpack(&account.data).unwrap();
    token_state.amount
}

// ============================================================================
// PROGRAM HELPERS
// ============================================================================

/// Helper: Configuration pointing at the mock warp route and the test mint.
/// Mailbox and IGP accounts only need to be distinct addresses; the mock warp
/// route never reads them.
pub fn test_configuration(mint: Pubkey) -> Configuration {
    Configuration {
        target_program: mock_warp_route_id(),
        noop: Pubkey::new_unique(),
        token_pda: Pubkey::new_unique(),
        mailbox_program: Pubkey::new_unique(),
        mailbox_outbox: Pubkey::new_unique(),
        message_dispatch_authority: Pubkey::new_unique(),
        igp_program: Pubkey::new_unique(),
        igp_program_data: Pubkey::new_unique(),
        igp_account: Pubkey::new_unique(),
        token_sender: Pubkey::new_unique(),
        token_program: spl_token::id(),
        mint,
        destination_domain: DESTINATION_DOMAIN,
        evm_recipient: pad_recipient(&EVM_RECIPIENT).unwrap(),
        decimals: DECIMALS,
    }
}

/// Helper: Initialize a holder record for `creator`
pub async fn initialize_holder(
    context: &mut ProgramTestContext,
    creator: &Keypair,
    owner: Pubkey,
    strategist: Pubkey,
    config: Configuration,
) -> Result<Pubkey, BanksClientError> {
    let program_id = test_program_id();
    let ix = instruction::initialize(&program_id, &creator.pubkey(), owner, strategist, config).unwrap();
    send_tx(context, creator, &[ix], &[]).await?;
    Ok(holder_address(&program_id, &creator.pubkey()).0)
}

/// Helper: Read the holder record
pub async fn read_holder(context: &mut ProgramTestContext, holder: Pubkey) -> HolderState {
    let account = context
        .banks_client
        .get_account(holder)
        .await
        .unwrap()
        .unwrap();
    HolderState::try_from_slice(&account.data).unwrap()
}

/// Helper: Build a TransferRemote instruction with a fresh unique message keypair
pub fn transfer_remote_ix(
    env: &TestEnv,
    strategist: &Pubkey,
    config: &Configuration,
    strategist_token: &Pubkey,
    amount: u64,
) -> (Instruction, Keypair) {
    let unique_message = Keypair::new();
    let ix = instruction::transfer_remote(
        &env.program_id,
        &env.holder,
        strategist,
        config,
        &unique_message.pubkey(),
        &env.holder_token,
        strategist_token,
        amount,
    )
    .unwrap();
    (ix, unique_message)
}

// ============================================================================
// TEST ENVIRONMENT
// ============================================================================

/// Test environment with an initialized holder and funded custody account
pub struct TestEnv {
    pub program_id: Pubkey,
    pub creator: Keypair,
    pub owner: Keypair,
    pub strategist: Keypair,
    pub mint_authority: Keypair,
    pub mint: Pubkey,
    pub config: Configuration,
    pub holder: Pubkey,
    pub holder_token: Pubkey,
    pub strategist_token: Pubkey,
}

/// Helper: Create a baseline environment used by most tests
pub async fn setup_basic_env(context: &mut ProgramTestContext) -> TestEnv {
    let creator = context.payer.insecure_clone();
    let program_id = test_program_id();
    let owner = Keypair::new();
    let strategist = Keypair::new();
    let mint_authority = Keypair::new();

    // Fund owner and strategist
    let fund_owner = system_instruction::transfer(&creator.pubkey(), &owner.pubkey(), 1_000_000_000);
    let fund_strategist =
        system_instruction::transfer(&creator.pubkey(), &strategist.pubkey(), 1_000_000_000);
    send_tx(context, &creator, &[fund_owner, fund_strategist], &[])
        .await
        .unwrap();

    let mint = create_mint(context, &creator, &mint_authority, DECIMALS).await;
    let config = test_configuration(mint);

    let holder = initialize_holder(
        context,
        &creator,
        owner.pubkey(),
        strategist.pubkey(),
        config.clone(),
    )
    .await
    .unwrap();

    // Custody account is owned by the holder PDA
    let holder_token = create_token_account(context, &creator, mint, holder).await;
    let strategist_token = create_token_account(context, &creator, mint, strategist.pubkey()).await;
    mint_to(context, &creator, mint, &mint_authority, holder_token, CUSTODY_BALANCE).await;

    TestEnv {
        program_id,
        creator,
        owner,
        strategist,
        mint_authority,
        mint,
        config,
        holder,
        holder_token,
        strategist_token,
    }
}
