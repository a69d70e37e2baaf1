//! Overmind Coin Flip Contract
//!
//! A player predicts ten coin flips; the overmind later submits the actual
//! flips. An exact match pays the escrowed prize to the player. The prize can
//! be won once over the whole life of the contract.
//!
//! ## Game Flow
//! 1. The deployer approves this contract for `PRIZE_AMOUNT` on the token,
//!    then calls `init`, which pulls the prize into escrow and makes the
//!    deployer the overmind.
//! 2. Players call `guess_flips` with ten values in {0, 1}.
//! 3. The overmind calls `provide_flips_result` per game. A match transfers
//!    the whole escrow to the player and closes the game for everyone.
//!
//! ## Storage Strategy
//! - `instance()`: Overmind, Token, NextGameId, Prize. Small fixed config and
//!   counters sharing one ledger entry.
//! - `persistent()`: one `Game(id)` entry per game, TTL bumped on every write.
//!
//! ## Atomicity
//! Every invocation is applied all-or-nothing by the host. State is written
//! before the payout transfer; if the transfer fails the result, the latch,
//! and the transfer are rolled back together.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, Env, Vec,
};

use overmind_shared::{flips_match, validate_flips, FlipError};

mod access;
mod ledger;

pub use access::{role_of, Role};
pub use ledger::{Ledger, TokenLedger};

use access::require_overmind;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prize escrowed at init and paid to the first exact match.
pub const PRIZE_AMOUNT: i128 = 1_000_000_000_000;

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized     = 1,
    NotInitialized         = 2,
    NotAuthorized          = 3,
    InsufficientFunds      = 4,
    /// The deployer has not approved this contract for `PRIZE_AMOUNT`.
    InsufficientAllowance  = 5,
    PrizeAlreadyClaimed    = 6,
    GameNotFound           = 7,
    InvalidFlipCount       = 8,
    InvalidFlipValue       = 9,
    ResultAlreadySubmitted = 10,
    ResultNotSubmittedYet  = 11,
    Overflow               = 12,
}

impl From<FlipError> for Error {
    fn from(err: FlipError) -> Self {
        match err {
            FlipError::InvalidFlipCount => Error::InvalidFlipCount,
            FlipError::InvalidFlipValue => Error::InvalidFlipValue,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage Types
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Overmind,
    Token,
    NextGameId,
    Prize,
    // --- persistent() ---
    Game(u64),
}

/// One round: a prediction and, once the overmind has spoken, the result.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    pub id: u64,
    pub player: Address,
    pub predicted_flips: Vec<u32>,
    /// Empty while the game is pending.
    pub flips_result: Vec<u32>,
}

/// Who won the prize, recorded when the latch closes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrizeClaim {
    pub game_id: u64,
    pub player: Address,
}

/// One-shot prize latch. Moves from `Unclaimed` to `Claimed` at most once.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrizeStatus {
    Unclaimed,
    Claimed(PrizeClaim),
}

/// Snapshot returned by `state`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameState {
    pub next_game_id: u64,
    pub prize_claimed: bool,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct Initialized {
    pub overmind: Address,
    pub token: Address,
    pub prize_amount: i128,
}

#[contractevent]
pub struct FlipsGuessed {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub player: Address,
    pub predicted_flips: Vec<u32>,
}

#[contractevent]
pub struct ResultSubmitted {
    #[topic]
    pub game_id: u64,
    pub flips_result: Vec<u32>,
    pub timestamp: u64,
}

#[contractevent]
pub struct PrizeClaimed {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub player: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct CoinFlip;

#[contractimpl]
impl CoinFlip {
    // -----------------------------------------------------------------------
    // init
    // -----------------------------------------------------------------------

    /// Fund the escrow and open the game. May only be called once.
    ///
    /// `overmind` is the deployer: it must hold at least `PRIZE_AMOUNT` of
    /// `token` and have approved this contract to pull that amount. It becomes
    /// the only account allowed to submit results.
    pub fn init(env: Env, overmind: Address, token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Overmind) {
            return Err(Error::AlreadyInitialized);
        }

        overmind.require_auth();

        let ledger = TokenLedger::new(&env, &token);
        let escrow = env.current_contract_address();

        if ledger.balance_of(&overmind) < PRIZE_AMOUNT {
            return Err(Error::InsufficientFunds);
        }
        if ledger.allowance(&overmind, &escrow) < PRIZE_AMOUNT {
            return Err(Error::InsufficientAllowance);
        }

        env.storage().instance().set(&DataKey::Overmind, &overmind);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::NextGameId, &0u64);
        env.storage()
            .instance()
            .set(&DataKey::Prize, &PrizeStatus::Unclaimed);
        bump_instance(&env);

        ledger.transfer_from(&escrow, &overmind, &escrow, PRIZE_AMOUNT);

        Initialized {
            overmind,
            token,
            prize_amount: PRIZE_AMOUNT,
        }
        .publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // guess_flips
    // -----------------------------------------------------------------------

    /// Record a prediction of ten flips for `player`. Returns the new game id.
    pub fn guess_flips(
        env: Env,
        player: Address,
        predicted_flips: Vec<u32>,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        player.require_auth();

        require_prize_unclaimed(&env)?;
        validate_flips(&predicted_flips)?;

        let game_id = get_next_game_id(&env);
        let next_game_id = game_id.checked_add(1).ok_or(Error::Overflow)?;

        let game = Game {
            id: game_id,
            player: player.clone(),
            predicted_flips: predicted_flips.clone(),
            flips_result: Vec::new(&env),
        };
        save_game(&env, &game);
        env.storage()
            .instance()
            .set(&DataKey::NextGameId, &next_game_id);
        bump_instance(&env);

        FlipsGuessed {
            game_id,
            player,
            predicted_flips,
        }
        .publish(&env);

        Ok(game_id)
    }

    // -----------------------------------------------------------------------
    // provide_flips_result
    // -----------------------------------------------------------------------

    /// Resolve a pending game with the actual flips. Overmind only.
    ///
    /// Returns `true` when the prediction matched and the prize was paid.
    pub fn provide_flips_result(
        env: Env,
        overmind: Address,
        game_id: u64,
        flips_result: Vec<u32>,
    ) -> Result<bool, Error> {
        require_overmind(&env, &overmind)?;
        require_prize_unclaimed(&env)?;

        let mut game = load_game(&env, game_id)?;
        if !game.flips_result.is_empty() {
            return Err(Error::ResultAlreadySubmitted);
        }
        validate_flips(&flips_result)?;

        game.flips_result = flips_result.clone();
        save_game(&env, &game);

        let timestamp = env.ledger().timestamp();
        ResultSubmitted {
            game_id,
            flips_result,
            timestamp,
        }
        .publish(&env);

        if !flips_match(&game.predicted_flips, &game.flips_result) {
            return Ok(false);
        }

        // Latch closes before the external transfer.
        let claim = PrizeClaim {
            game_id,
            player: game.player.clone(),
        };
        env.storage()
            .instance()
            .set(&DataKey::Prize, &PrizeStatus::Claimed(claim));
        bump_instance(&env);

        let ledger = TokenLedger::new(&env, &get_token(&env));
        let escrow = env.current_contract_address();
        let amount = ledger.balance_of(&escrow);
        ledger.transfer(&escrow, &game.player, amount);

        PrizeClaimed {
            game_id,
            player: game.player,
            amount,
            timestamp,
        }
        .publish(&env);

        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether the game's prediction matches its result, recomputed on read.
    pub fn get_game_result(env: Env, game_id: u64) -> Result<bool, Error> {
        let game = load_game(&env, game_id)?;
        if game.flips_result.is_empty() {
            return Err(Error::ResultNotSubmittedYet);
        }
        Ok(flips_match(&game.predicted_flips, &game.flips_result))
    }

    pub fn get_game_by_id(env: Env, game_id: u64) -> Result<Game, Error> {
        load_game(&env, game_id)
    }

    /// All games in id order.
    pub fn get_all_games(env: Env) -> Result<Vec<Game>, Error> {
        require_initialized(&env)?;

        let mut games = Vec::new(&env);
        for game_id in 0..get_next_game_id(&env) {
            games.push_back(load_game(&env, game_id)?);
        }
        Ok(games)
    }

    pub fn state(env: Env) -> Result<GameState, Error> {
        require_initialized(&env)?;
        Ok(GameState {
            next_game_id: get_next_game_id(&env),
            prize_claimed: get_prize_status(&env) != PrizeStatus::Unclaimed,
        })
    }

    /// The prize latch, including the winning game and player once claimed.
    pub fn prize_status(env: Env) -> Result<PrizeStatus, Error> {
        require_initialized(&env)?;
        Ok(get_prize_status(&env))
    }

    pub fn get_token_balance(env: Env, account: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        Ok(TokenLedger::new(&env, &get_token(&env)).balance_of(&account))
    }

    /// The account holding the escrow: this contract's own address.
    pub fn get_resource_account_address(env: Env) -> Address {
        env.current_contract_address()
    }

    pub fn get_overmind(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Overmind)
            .ok_or(Error::NotInitialized)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !env.storage().instance().has(&DataKey::Overmind) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

fn require_prize_unclaimed(env: &Env) -> Result<(), Error> {
    match get_prize_status(env) {
        PrizeStatus::Unclaimed => Ok(()),
        PrizeStatus::Claimed(_) => Err(Error::PrizeAlreadyClaimed),
    }
}

fn get_prize_status(env: &Env) -> PrizeStatus {
    env.storage()
        .instance()
        .get(&DataKey::Prize)
        .unwrap_or(PrizeStatus::Unclaimed)
}

fn get_next_game_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextGameId)
        .unwrap_or(0)
}

fn get_token(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("CoinFlip: token not set")
}

fn load_game(env: &Env, game_id: u64) -> Result<Game, Error> {
    if game_id >= get_next_game_id(env) {
        return Err(Error::GameNotFound);
    }
    env.storage()
        .persistent()
        .get(&DataKey::Game(game_id))
        .ok_or(Error::GameNotFound)
}

/// Write a game to persistent storage and extend its TTL in one step.
fn save_game(env: &Env, game: &Game) {
    let key = DataKey::Game(game.id);
    env.storage().persistent().set(&key, game);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
