// tower/utils/token.rs

// external dependencies
use ::spl_token_2022::extension::transfer_fee::TransferFeeConfig;
use ::spl_token_2022::extension::BaseStateWithExtensions;
use ::spl_token_2022::extension::PodStateWithExtensions;
use ::spl_token_2022::pod::PodMint;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

pub fn transfer_tokens<'info>(
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    authority: &AccountInfo<'info>,
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    let transfer_options = TransferChecked {
        from: from.to_account_info(),
        to: to.to_account_info(),
        mint: mint.to_account_info(),
        authority: authority.clone(),
    };
    let cpi_context = CpiContext::new(token_program.to_account_info(), transfer_options);

    transfer_checked(cpi_context, amount, mint.decimals)
}

pub fn transfer_tokens_from_program<'info>(
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    authority: &AccountInfo<'info>,
    authority_seeds: &[&[&[u8]]],
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    let transfer_options = TransferChecked {
        from: from.to_account_info(),
        to: to.to_account_info(),
        mint: mint.to_account_info(),
        authority: authority.clone(),
    };
    let cpi_context = CpiContext::new_with_signer(
        token_program.to_account_info(),
        transfer_options,
        authority_seeds,
    );

    transfer_checked(cpi_context, amount, mint.decimals)
}

/// Token-2022 mints with a transfer fee would break reserve accounting.
pub fn has_transfer_fee<'info>(mint: &InterfaceAccount<'info, Mint>) -> bool {
    let account_info = mint.to_account_info();
    let data = account_info.data.borrow();

    match PodStateWithExtensions::<PodMint>::unpack(&data) {
        Ok(mint) => mint.get_extension::<TransferFeeConfig>().is_ok(),
        Err(_) => false,
    }
}
