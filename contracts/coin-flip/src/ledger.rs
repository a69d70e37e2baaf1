//! Ledger client: the narrow slice of a SEP-41 token the game relies on.

use soroban_sdk::{token::TokenClient, Address, Env};

/// Token operations consumed by the escrow. Anything beyond these calls is
/// the token contract's own business.
pub trait Ledger {
    fn balance_of(&self, account: &Address) -> i128;

    fn transfer(&self, from: &Address, to: &Address, amount: i128);

    fn allowance(&self, owner: &Address, spender: &Address) -> i128;

    /// Pull `amount` from `from` into `to` against an allowance granted to
    /// `spender`.
    fn transfer_from(&self, spender: &Address, from: &Address, to: &Address, amount: i128);
}

/// `Ledger` backed by a deployed token contract.
pub struct TokenLedger<'a> {
    client: TokenClient<'a>,
}

impl<'a> TokenLedger<'a> {
    pub fn new(env: &Env, token: &Address) -> Self {
        Self {
            client: TokenClient::new(env, token),
        }
    }
}

impl Ledger for TokenLedger<'_> {
    fn balance_of(&self, account: &Address) -> i128 {
        self.client.balance(account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: i128) {
        self.client.transfer(from, to, &amount);
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> i128 {
        self.client.allowance(owner, spender)
    }

    fn transfer_from(&self, spender: &Address, from: &Address, to: &Address, amount: i128) {
        self.client.transfer_from(spender, from, to, &amount);
    }
}
