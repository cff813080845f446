use crate::error::TreasuryError;
use crate::storage::{get_state, set_state};
use crate::{load_config, try_call};
use rather_math::split_fee;
use rather_types::ProceedsRoute;
use soroban_sdk::auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation};
use soroban_sdk::{token, vec, Address, Env, IntoVal, Symbol};

/// Swap the whole burn balance for tokens and destroy them.
///
/// The pool pulls only `burn - fee` from the treasury; the fee never
/// leaves, so it is booked to operational. Returns the amount burned.
pub fn manual_buy_and_burn(env: &Env) -> Result<i128, TreasuryError> {
    let config = load_config(env)?;
    config.admin.require_auth();

    let pool = config.pool.clone().ok_or(TreasuryError::NotConfigured)?;

    let mut state = get_state(env);
    let amount = state.burn_balance;
    if amount <= 0 {
        return Err(TreasuryError::InsufficientTreasuryBalance);
    }

    let (fee, amount_in) = split_fee(amount).ok_or(TreasuryError::ArithmeticError)?;

    state
        .debit(ProceedsRoute::Burn, amount)
        .ok_or(TreasuryError::InsufficientTreasuryBalance)?;
    state
        .credit(ProceedsRoute::Operational, fee)
        .ok_or(TreasuryError::ArithmeticError)?;
    set_state(env, &state);

    let treasury = env.current_contract_address();
    authorize_pool_pull(env, &config.base_asset, &treasury, &pool, amount_in);

    let rather_out = pool_swap(env, &pool, &treasury, amount)?;

    let burned = token::Client::new(env, &config.rather_token).try_burn(&treasury, &rather_out);
    if !matches!(burned, Ok(Ok(()))) {
        return Err(TreasuryError::BurnFailed);
    }

    env.events().publish(
        (Symbol::new(env, "burned"),),
        (amount, rather_out),
    );

    Ok(rather_out)
}

/// The pool moves base asset out of the treasury on our behalf; that
/// transfer is a sub-invocation the treasury has to pre-authorize.
fn authorize_pool_pull(env: &Env, base_asset: &Address, treasury: &Address, pool: &Address, amount: i128) {
    env.authorize_as_current_contract(vec![
        env,
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: base_asset.clone(),
                fn_name: Symbol::new(env, "transfer"),
                args: (treasury.clone(), pool.clone(), amount).into_val(env),
            },
            sub_invocations: vec![env],
        }),
    ]);
}

fn pool_swap(env: &Env, pool: &Address, user: &Address, eth_in: i128) -> Result<i128, TreasuryError> {
    try_call(
        env,
        pool,
        "swap_eth_for_rather",
        (user.clone(), eth_in).into_val(env),
    )
    .ok_or(TreasuryError::BurnFailed)
}
