//! Single-role gate separating the overmind from ordinary players.

use soroban_sdk::{Address, Env};

use crate::{DataKey, Error};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Overmind,
    Player,
}

/// An uninitialized contract has no overmind, so every account is a player.
pub fn role_of(env: &Env, account: &Address) -> Role {
    let overmind: Option<Address> = env.storage().instance().get(&DataKey::Overmind);
    match overmind {
        Some(overmind) if &overmind == account => Role::Overmind,
        _ => Role::Player,
    }
}

/// Verify that `caller` signed the invocation and holds the overmind role.
pub fn require_overmind(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if role_of(env, caller) != Role::Overmind {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}
