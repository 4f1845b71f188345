//! Menu choices and the fixed console messages

use crate::types::AtmError;
use std::str::FromStr;

pub const USER_ID_PROMPT: &str = "Enter User ID: ";
pub const PIN_PROMPT: &str = "Enter PIN: ";
pub const INVALID_LOGIN: &str = "Invalid User ID or PIN. Please try again.";
pub const TOO_MANY_ATTEMPTS: &str = "Too many failed login attempts.";

pub const MENU: &str = "\nATM Menu:\n\
                        1. Transaction History\n\
                        2. Withdraw\n\
                        3. Deposit\n\
                        4. Transfer\n\
                        5. Quit";
pub const INVALID_CHOICE: &str = "Invalid choice. Please select a valid option.";

pub const HISTORY_HEADER: &str = "Transaction History:";
pub const WITHDRAW_PROMPT: &str = "Enter the withdrawal amount: $";
pub const DEPOSIT_PROMPT: &str = "Enter the deposit amount: $";
pub const RECIPIENT_PROMPT: &str = "Enter the recipient's User ID: ";
pub const TRANSFER_PROMPT: &str = "Enter the transfer amount: $";

pub const INSUFFICIENT_BALANCE: &str = "Insufficient balance.";
pub const INSUFFICIENT_FOR_TRANSFER: &str = "Insufficient balance for the transfer.";
pub const RECIPIENT_NOT_FOUND: &str = "Recipient not found.";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than zero.";
pub const OWN_ACCOUNT: &str = "Cannot transfer to your own account.";
pub const AMOUNT_TOO_LARGE: &str = "Amount too large.";
pub const AMOUNT_TOO_PRECISE: &str = "Amount has too many decimal places.";
pub const INVALID_NUMBER: &str = "Invalid input. Please enter a number.";

pub const GOODBYE: &str = "Thank you for using the ATM.";

/// One of the five menu options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    History,
    Withdraw,
    Deposit,
    Transfer,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = AtmError;

    /// Parse the number typed at the menu
    ///
    /// Anything other than 1-5, including text that is not a number, is an
    /// `InvalidMenuChoice`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().parse::<u32>() {
            Ok(1) => Ok(MenuChoice::History),
            Ok(2) => Ok(MenuChoice::Withdraw),
            Ok(3) => Ok(MenuChoice::Deposit),
            Ok(4) => Ok(MenuChoice::Transfer),
            Ok(5) => Ok(MenuChoice::Quit),
            _ => Err(AtmError::invalid_menu_choice(input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::history("1", MenuChoice::History)]
    #[case::withdraw("2", MenuChoice::Withdraw)]
    #[case::deposit("3", MenuChoice::Deposit)]
    #[case::transfer("4", MenuChoice::Transfer)]
    #[case::quit("5", MenuChoice::Quit)]
    #[case::leading_zero("05", MenuChoice::Quit)]
    fn test_valid_choices(#[case] input: &str, #[case] expected: MenuChoice) {
        assert_eq!(input.parse::<MenuChoice>(), Ok(expected));
    }

    #[rstest]
    #[case::zero("0")]
    #[case::six("6")]
    #[case::negative("-1")]
    #[case::text("withdraw")]
    #[case::decimal("2.0")]
    fn test_invalid_choices(#[case] input: &str) {
        assert_eq!(
            input.parse::<MenuChoice>(),
            Err(AtmError::invalid_menu_choice(input))
        );
    }

    #[test]
    fn test_menu_lists_five_options() {
        let lines: Vec<&str> = MENU.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "ATM Menu:",
                "1. Transaction History",
                "2. Withdraw",
                "3. Deposit",
                "4. Transfer",
                "5. Quit",
            ]
        );
    }
}
