// tower/controller/mod.rs
//
// Game rules over plain `Global` / `Tower` values. Every operation works on
// copies, holds the global guard while it runs, and writes the copies back
// only when it succeeds. Token movements and venue calls go through the host
// traits below, after the host has committed the working state.

use anchor_lang::prelude::*;

pub mod referral;
pub mod treasury;

use crate::{
    errors::TowerError,
    liquidity::{LiquidityQuote, LiquidityVenue},
    state::{Global, ProvisionPlan, Tower},
    utils::math::{checked_add, checked_sub},
};
use referral::{credit_upline, resolve_referrer, ReferralCredit};
use treasury::{plan_withdrawal, reinvest_credits, Payout};

pub trait Checkpoint {
    /// Persists the working state ahead of an external call.
    fn commit(&mut self, global: &Global, towers: &[&Tower]) -> Result<()>;
}

pub trait PaymentRail: Checkpoint {
    /// Pulls `amount` from the payer: `fee` to the manager, the rest to the reserve.
    fn receive(&mut self, amount: u64, fee: u64) -> Result<()>;

    /// Pays `amount` out of the reserve to the tower owner.
    fn pay(&mut self, amount: u64) -> Result<()>;
}

pub trait TokenLedger: Checkpoint {
    /// Game tokens held by the vault.
    fn available(&self) -> u64;

    /// Sends `amount` game tokens from the vault to the claimer.
    fn allocate(&mut self, amount: u64) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    pub credits: u64,
    pub fee: u64,
    pub first_deposit: bool,
    pub referrer: Option<Pubkey>,
    pub referrals: Vec<ReferralCredit>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeReceipt {
    pub tier: u8,
    pub level: u8,
    pub cost: u64,
    pub yield_rate: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub payout: Payout,
    pub remaining: u64, // withdrawable earnings left on the tower
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReinvestReceipt {
    pub earnings: u64,
    pub credits: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidityReceipt {
    pub pool: Pubkey,
    pub reserve_used: u64,
    pub token_used: u64,
    pub shares: u64,
    pub seeded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub tokens: u64,
    pub liquidity: Option<LiquidityReceipt>,
}

fn publish(global: &mut Global, mut working: Global) {
    working.leave();
    *global = working;
}

fn working_tower(tower: &Tower) -> Result<Tower> {
    tower.ensure_registered()?;
    Ok(tower.clone())
}

/// Earnings may leave a tower that never deposited, such as the manager's.
fn earning_tower(tower: &Tower) -> Result<Tower> {
    if tower.owner == Pubkey::default() {
        return err!(TowerError::NotRegistered);
    }
    Ok(tower.clone())
}

#[allow(clippy::too_many_arguments)]
pub fn deposit<H: PaymentRail + ?Sized>(
    host: &mut H,
    global: &mut Global,
    tower: &mut Tower,
    upline: &mut [Tower],
    payer: Pubkey,
    referrer: Option<Pubkey>,
    amount: u64,
    now: i64,
) -> Result<DepositReceipt> {
    let mut g = global.enter()?;
    g.ensure_started(now)?;

    if amount == 0 {
        return err!(TowerError::ZeroAmount);
    }
    let credits = g.credits_for_payment(amount)?;
    if credits == 0 {
        return err!(TowerError::ZeroAmount);
    }

    let mut t = tower.clone();
    let credit_balance = checked_add(t.credit_balance, credits)?;
    if credit_balance > g.max_credits_per_tower {
        return err!(TowerError::MaxCreditsExceeded);
    }

    let first_deposit = !t.registered;
    if first_deposit {
        // a named referrer without a registered tower up front falls back to the manager
        let bound = match resolve_referrer(&payer, referrer, &g.manager) {
            Some(key)
                if key != g.manager
                    && !upline
                        .first()
                        .map_or(false, |up| up.owner == key && up.registered) =>
            {
                resolve_referrer(&payer, None, &g.manager)
            }
            bound => bound,
        };

        t.owner = payer;
        t.registered = true;
        t.referrer = bound;
        t.last_accrual_ts = now;
        g.total_towers = checked_add(g.total_towers, 1)?;
    } else if t.owner != payer {
        return err!(TowerError::InvalidAccount);
    }

    t.credit_balance = credit_balance;
    t.total_deposited = checked_add(t.total_deposited, amount)?;

    let fee = g.fee_for(amount)?;
    g.reserve_balance = checked_add(g.reserve_balance, checked_sub(amount, fee)?)?;
    g.total_invested = checked_add(g.total_invested, amount)?;

    let mut up = upline.to_vec();
    let referrals = credit_upline(&g, &payer, t.referrer, &mut up, credits)?;

    let mut touched = vec![&t];
    touched.extend(up.iter());
    host.commit(&g, &touched)?;
    host.receive(amount, fee)?;

    let receipt = DepositReceipt {
        credits,
        fee,
        first_deposit,
        referrer: t.referrer,
        referrals,
    };

    publish(global, g);
    *tower = t;
    upline.clone_from_slice(&up);

    Ok(receipt)
}

pub fn upgrade_tower(
    global: &mut Global,
    tower: &mut Tower,
    tier: u8,
    now: i64,
) -> Result<UpgradeReceipt> {
    let g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = working_tower(tower)?;

    let entry = t.next_upgrade(tier)?;
    // earnings up to now accrue at the old rate
    t.accrue(now, g.max_accrual_hours)?;
    t.apply_upgrade(tier, entry)?;

    let receipt = UpgradeReceipt {
        tier,
        level: t.levels[tier as usize],
        cost: entry.cost,
        yield_rate: t.yield_rate,
    };

    publish(global, g);
    *tower = t;

    Ok(receipt)
}

/// Moves accrued yield into the withdrawable balance and returns the amount moved.
pub fn collect(global: &mut Global, tower: &mut Tower, now: i64) -> Result<u64> {
    let g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = working_tower(tower)?;

    t.accrue(now, g.max_accrual_hours)?;
    let collected = t.pending_earnings;
    t.withdrawable_earnings = checked_add(t.withdrawable_earnings, collected)?;
    t.pending_earnings = 0;

    publish(global, g);
    *tower = t;

    Ok(collected)
}

pub fn withdraw<H: PaymentRail + ?Sized>(
    host: &mut H,
    global: &mut Global,
    tower: &mut Tower,
    now: i64,
) -> Result<WithdrawReceipt> {
    let mut g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = earning_tower(tower)?;

    if t.withdrawable_earnings == 0 {
        return err!(TowerError::ZeroAmount);
    }

    let payout = plan_withdrawal(&g, t.withdrawable_earnings)?;
    t.withdrawable_earnings = checked_sub(t.withdrawable_earnings, payout.earnings_spent)?;
    t.total_withdrawn = checked_add(t.total_withdrawn, payout.paid)?;
    g.reserve_balance = checked_sub(g.reserve_balance, payout.paid)?;

    if payout.is_partial() {
        msg!(
            "Reserve short: paying {} of {}, {} earnings stay withdrawable",
            payout.paid,
            payout.owed,
            t.withdrawable_earnings
        );
    }

    if payout.paid > 0 {
        host.commit(&g, &[&t])?;
        host.pay(payout.paid)?;
    }

    let receipt = WithdrawReceipt {
        payout,
        remaining: t.withdrawable_earnings,
    };

    publish(global, g);
    *tower = t;

    Ok(receipt)
}

pub fn reinvest(global: &mut Global, tower: &mut Tower, now: i64) -> Result<ReinvestReceipt> {
    let g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = earning_tower(tower)?;

    let earnings = t.withdrawable_earnings;
    if earnings == 0 {
        return err!(TowerError::ZeroAmount);
    }

    let credits = reinvest_credits(&g, earnings)?;
    if credits == 0 {
        return err!(TowerError::ZeroAmount);
    }

    let credit_balance = checked_add(t.credit_balance, credits)?;
    if credit_balance > g.max_credits_per_tower {
        return err!(TowerError::CreditCapExceeded);
    }

    t.credit_balance = credit_balance;
    t.withdrawable_earnings = 0;

    publish(global, g);
    *tower = t;

    Ok(ReinvestReceipt { earnings, credits })
}

pub fn claim_referral_earnings(global: &mut Global, tower: &mut Tower, now: i64) -> Result<u64> {
    let g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = earning_tower(tower)?;

    let amount = t.unclaimed_referral;
    if amount == 0 {
        return err!(TowerError::ZeroAmount);
    }

    t.withdrawable_earnings = checked_add(t.withdrawable_earnings, amount)?;
    t.unclaimed_referral = 0;

    publish(global, g);
    *tower = t;

    Ok(amount)
}

pub fn claim_token<H, V>(
    host: &mut H,
    venue: &mut V,
    global: &mut Global,
    tower: &mut Tower,
    min_reserve: u64,
    min_token: u64,
    now: i64,
) -> Result<ClaimReceipt>
where
    H: TokenLedger + ?Sized,
    V: LiquidityVenue + ?Sized,
{
    let mut g = global.enter()?;
    g.ensure_started(now)?;
    let mut t = working_tower(tower)?;

    if !t.is_fully_built() {
        return err!(TowerError::ClaimForbidden);
    }
    if t.has_claimed {
        return err!(TowerError::AlreadyClaimed);
    }

    let available = host.available();
    if available < g.tokens_per_claim {
        return err!(TowerError::TokenReserveExhausted);
    }

    t.has_claimed = true;
    host.commit(&g, &[&t])?;

    let prepared = if g.reserve_balance > 0 {
        let budget = token_budget(&g, available - g.tokens_per_claim)?;
        let quote = venue.quote(g.reserve_balance, budget, g.liquidity.pool)?;
        if quote.is_empty() {
            msg!(
                "Reserve of {} too small for the pool ratio, no liquidity added",
                g.reserve_balance
            );
            None
        } else {
            if quote.reserve_amount < min_reserve || quote.token_amount < min_token {
                return err!(TowerError::SlippageExceeded);
            }
            let plan = open_gate(&mut g, &quote)?;
            host.commit(&g, &[&t])?;
            Some((plan, quote))
        }
    } else {
        msg!("Reserve is empty, no liquidity added");
        None
    };

    host.allocate(g.tokens_per_claim)?;

    let liquidity = match prepared {
        Some((plan, quote)) => Some(settle(&mut g, venue, plan, &quote)?),
        None => None,
    };

    let receipt = ClaimReceipt {
        tokens: g.tokens_per_claim,
        liquidity,
    };

    publish(global, g);
    *tower = t;

    Ok(receipt)
}

pub fn force_add_liquidity<H, V>(
    host: &mut H,
    venue: &mut V,
    global: &mut Global,
    now: i64,
) -> Result<LiquidityReceipt>
where
    H: TokenLedger + ?Sized,
    V: LiquidityVenue + ?Sized,
{
    let mut g = global.enter()?;
    g.liquidity.ensure_force_window(now)?;

    if g.reserve_balance == 0 {
        return err!(TowerError::ReserveEmpty);
    }
    let budget = token_budget(&g, host.available())?;

    host.commit(&g, &[])?;
    let quote = venue.quote(g.reserve_balance, budget, g.liquidity.pool)?;
    let plan = open_gate(&mut g, &quote)?;
    host.commit(&g, &[])?;

    let receipt = settle(&mut g, venue, plan, &quote)?;

    publish(global, g);

    Ok(receipt)
}

fn token_budget(g: &Global, vault_balance: u64) -> Result<u64> {
    let budget = g.liquidity_tokens_per_provision.min(vault_balance);
    if budget == 0 {
        return err!(TowerError::TokenReserveExhausted);
    }

    Ok(budget)
}

/// Earmarks the quoted reserve and moves the gate past `NotProvisioned`.
fn open_gate(g: &mut Global, quote: &LiquidityQuote) -> Result<ProvisionPlan> {
    if quote.is_empty() || quote.reserve_amount > g.reserve_balance {
        return err!(TowerError::ExternalVenue);
    }

    g.reserve_balance -= quote.reserve_amount;
    let plan = g.liquidity.begin()?;
    g.liquidity.seal();

    Ok(plan)
}

fn settle<V: LiquidityVenue + ?Sized>(
    g: &mut Global,
    venue: &mut V,
    plan: ProvisionPlan,
    quote: &LiquidityQuote,
) -> Result<LiquidityReceipt> {
    let provisioned = venue.provision(quote, plan.pool())?;
    if provisioned.reserve_used > quote.reserve_amount
        || provisioned.token_used > quote.token_amount
    {
        return err!(TowerError::ExternalVenue);
    }

    g.liquidity.record_pool(plan, provisioned.pool)?;
    g.reserve_balance = checked_add(
        g.reserve_balance,
        quote.reserve_amount - provisioned.reserve_used,
    )?;

    msg!(
        "Liquidity added to {}: {} reserve, {} tokens, {} shares",
        provisioned.pool,
        provisioned.reserve_used,
        provisioned.token_used,
        provisioned.shares
    );

    Ok(LiquidityReceipt {
        pool: provisioned.pool,
        reserve_used: provisioned.reserve_used,
        token_used: provisioned.token_used,
        shares: provisioned.shares,
        seeded: plan == ProvisionPlan::Seed,
    })
}
