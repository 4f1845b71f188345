//! Interactive ATM session
//!
//! A session is a small state machine driven by console input:
//!
//! ```text
//! Unauthenticated --(valid id + PIN)--> Authenticated
//! Unauthenticated --(invalid)---------> Unauthenticated
//! Authenticated   --(menu 1-4, any)---> Authenticated
//! Authenticated   --(menu 5)----------> Terminated(Quit)
//! any state       --(end of input)----> Terminated(EndOfInput)
//! ```
//!
//! Domain failures (insufficient funds, unknown recipient, bad amount, bad
//! menu choice) are printed and the session carries on. Only console I/O
//! errors and an exhausted login policy end a session with an error.

pub mod menu;

use crate::core::Directory;
use crate::io::Console;
use crate::types::{AccountId, AtmError, Pin};
use log::{info, warn};
use menu::MenuChoice;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user picked Quit
    Quit,
    /// Input ran out
    EndOfInput,
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(AccountId),
    Terminated(SessionEnd),
}

/// How many failed logins are tolerated
///
/// The default places no limit: the prompt repeats until a login succeeds
/// or input ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginPolicy {
    pub max_attempts: Option<u32>,
}

impl LoginPolicy {
    pub fn unbounded() -> Self {
        LoginPolicy { max_attempts: None }
    }

    pub fn bounded(max_attempts: u32) -> Self {
        LoginPolicy {
            max_attempts: Some(max_attempts),
        }
    }
}

/// One user at one ATM
pub struct Session<D, R, W> {
    directory: D,
    console: Console<R, W>,
    policy: LoginPolicy,
    state: SessionState,
    failed_logins: u32,
}

impl<D: Directory, R: BufRead, W: Write> Session<D, R, W> {
    pub fn new(directory: D, input: R, output: W, policy: LoginPolicy) -> Self {
        Session {
            directory,
            console: Console::new(input, output),
            policy,
            state: SessionState::Unauthenticated,
            failed_logins: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until it terminates
    ///
    /// # Errors
    ///
    /// - `Io` if the console streams fail
    /// - `LoginAttemptsExhausted` if a bounded login policy runs out
    pub fn run(&mut self) -> Result<SessionEnd, AtmError> {
        loop {
            if let SessionState::Terminated(end) = self.step()? {
                self.console.flush()?;
                return Ok(end);
            }
        }
    }

    /// Perform one transition: one login attempt or one menu action
    pub fn step(&mut self) -> Result<SessionState, AtmError> {
        self.state = match self.state {
            SessionState::Unauthenticated => self.login()?,
            SessionState::Authenticated(account) => self.serve(account)?,
            terminated @ SessionState::Terminated(_) => terminated,
        };
        Ok(self.state)
    }

    fn login(&mut self) -> Result<SessionState, AtmError> {
        // Any integer is a well-formed answer; ones that cannot name an
        // account (negative, too large) are simply wrong credentials.
        let Some(raw_id) = self.read_number::<i64>(menu::USER_ID_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };
        let Some(raw_pin) = self.read_number::<i64>(menu::PIN_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };

        let login = match (AccountId::try_from(raw_id), Pin::try_from(raw_pin)) {
            (Ok(id), Ok(pin)) => self.directory.authenticate(id, pin).map(|()| id),
            _ => Err(AtmError::InvalidCredentials),
        };

        match login {
            Ok(id) => {
                info!("account {} logged in", id);
                Ok(SessionState::Authenticated(id))
            }
            Err(error) => {
                self.failed_logins += 1;
                warn!("login failed for user id {}: {}", raw_id, error);

                if let Some(max) = self.policy.max_attempts {
                    if self.failed_logins >= max {
                        self.console.line(menu::TOO_MANY_ATTEMPTS)?;
                        self.console.flush()?;
                        return Err(AtmError::LoginAttemptsExhausted {
                            attempts: self.failed_logins,
                        });
                    }
                }
                self.console.line(menu::INVALID_LOGIN)?;
                Ok(SessionState::Unauthenticated)
            }
        }
    }

    fn serve(&mut self, account: AccountId) -> Result<SessionState, AtmError> {
        self.console.line(menu::MENU)?;

        let Some(token) = self.console.next_token()? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };

        match token.parse::<MenuChoice>() {
            Ok(MenuChoice::History) => self.show_history(account),
            Ok(MenuChoice::Withdraw) => self.withdraw(account),
            Ok(MenuChoice::Deposit) => self.deposit(account),
            Ok(MenuChoice::Transfer) => self.transfer(account),
            Ok(MenuChoice::Quit) => {
                info!("account {} quit", account);
                self.console.line(menu::GOODBYE)?;
                Ok(SessionState::Terminated(SessionEnd::Quit))
            }
            Err(error) => {
                warn!("{}", error);
                self.console.line(menu::INVALID_CHOICE)?;
                Ok(SessionState::Authenticated(account))
            }
        }
    }

    fn show_history(&mut self, account: AccountId) -> Result<SessionState, AtmError> {
        let history = self.directory.history(account)?;

        self.console.line(menu::HISTORY_HEADER)?;
        for transaction in &history {
            self.console.line(&transaction.to_string())?;
        }
        Ok(SessionState::Authenticated(account))
    }

    fn withdraw(&mut self, account: AccountId) -> Result<SessionState, AtmError> {
        let Some(amount) = self.read_number::<Decimal>(menu::WITHDRAW_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };

        if let Err(error) = self.directory.withdraw(account, amount) {
            self.report(error, menu::INSUFFICIENT_BALANCE)?;
        }
        Ok(SessionState::Authenticated(account))
    }

    fn deposit(&mut self, account: AccountId) -> Result<SessionState, AtmError> {
        let Some(amount) = self.read_number::<Decimal>(menu::DEPOSIT_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };

        if let Err(error) = self.directory.deposit(account, amount) {
            self.report(error, menu::INSUFFICIENT_BALANCE)?;
        }
        Ok(SessionState::Authenticated(account))
    }

    fn transfer(&mut self, account: AccountId) -> Result<SessionState, AtmError> {
        let Some(recipient) = self.read_number::<AccountId>(menu::RECIPIENT_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };
        let Some(amount) = self.read_number::<Decimal>(menu::TRANSFER_PROMPT)? else {
            return Ok(SessionState::Terminated(SessionEnd::EndOfInput));
        };

        if !self.directory.contains(recipient) {
            self.report(
                AtmError::account_not_found(recipient),
                menu::INSUFFICIENT_FOR_TRANSFER,
            )?;
            return Ok(SessionState::Authenticated(account));
        }

        if let Err(error) = self.directory.transfer(account, recipient, amount) {
            self.report(error, menu::INSUFFICIENT_FOR_TRANSFER)?;
        }
        Ok(SessionState::Authenticated(account))
    }

    /// Print a recoverable error; pass fatal ones back up
    fn report(&mut self, error: AtmError, insufficient: &str) -> Result<(), AtmError> {
        if !error.is_recoverable() {
            return Err(error);
        }
        warn!("{}", error);

        let message = match &error {
            AtmError::InsufficientFunds { .. } => insufficient.to_string(),
            AtmError::AccountNotFound { .. } => menu::RECIPIENT_NOT_FOUND.to_string(),
            AtmError::InvalidAmount { .. } => menu::AMOUNT_NOT_POSITIVE.to_string(),
            AtmError::SelfTransfer { .. } => menu::OWN_ACCOUNT.to_string(),
            AtmError::ArithmeticOverflow { .. } => menu::AMOUNT_TOO_LARGE.to_string(),
            AtmError::PrecisionLoss { .. } => menu::AMOUNT_TOO_PRECISE.to_string(),
            AtmError::InvalidInput { .. } => menu::INVALID_NUMBER.to_string(),
            other => other.to_string(),
        };
        self.console.line(&message)
    }

    /// Prompt until a token parses as `T`
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_number<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>, AtmError> {
        loop {
            self.console.prompt(prompt)?;
            let Some(token) = self.console.next_token()? else {
                return Ok(None);
            };
            match parse_number::<T>(&token) {
                Ok(value) => return Ok(Some(value)),
                Err(error) => self.report(error, menu::INSUFFICIENT_BALANCE)?,
            }
        }
    }
}

/// Parse one console token as a number
fn parse_number<T: FromStr>(token: &str) -> Result<T, AtmError> {
    token
        .parse::<T>()
        .map_err(|_| AtmError::invalid_input(token, "a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccountDirectory, SharedDirectory};
    use crate::io::{populate, DEFAULT_ACCOUNTS};
    use crate::types::TransactionKind;
    use rstest::rstest;
    use std::thread;

    fn directory() -> AccountDirectory {
        let mut directory = AccountDirectory::new();
        populate(&mut directory, &DEFAULT_ACCOUNTS).unwrap();
        directory
    }

    /// Run a whole session over `input`, returning the outcome and the output text
    fn run_session(
        directory: &mut AccountDirectory,
        input: &str,
        policy: LoginPolicy,
    ) -> (Result<SessionEnd, AtmError>, String) {
        let mut output = Vec::new();
        let result = Session::new(directory, input.as_bytes(), &mut output, policy).run();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_invalid_login_then_valid_login() {
        let mut directory = directory();
        let mut output = Vec::new();
        let mut session = Session::new(
            &mut directory,
            "12345 9999\n12345 1234\n".as_bytes(),
            &mut output,
            LoginPolicy::default(),
        );

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.step().unwrap(), SessionState::Unauthenticated);
        assert_eq!(session.step().unwrap(), SessionState::Authenticated(12345));
    }

    #[test]
    fn test_end_of_input_while_unauthenticated() {
        let mut directory = directory();
        let (result, output) = run_session(&mut directory, "1 1\n", LoginPolicy::default());

        assert_eq!(result, Ok(SessionEnd::EndOfInput));
        assert_eq!(
            output,
            "Enter User ID: Enter PIN: Invalid User ID or PIN. Please try again.\nEnter User ID: "
        );
    }

    #[test]
    fn test_bounded_login_policy() {
        let mut directory = directory();
        let (result, output) =
            run_session(&mut directory, "1 1\n2 2\n3 3\n", LoginPolicy::bounded(2));

        assert_eq!(result, Err(AtmError::LoginAttemptsExhausted { attempts: 2 }));
        assert!(output.ends_with("Too many failed login attempts.\n"));
        assert_eq!(output.matches("Invalid User ID or PIN").count(), 1);
    }

    #[test]
    fn test_malformed_number_reprompts() {
        let mut directory = directory();
        let (result, output) =
            run_session(&mut directory, "abc\n12345\n1234\n3\nten\n10\n5\n", LoginPolicy::default());

        assert_eq!(result, Ok(SessionEnd::Quit));
        assert_eq!(output.matches("Invalid input. Please enter a number.").count(), 2);
        assert_eq!(directory.balance(12345), Ok(Decimal::TEN));
    }

    #[test]
    fn test_invalid_utf8_is_malformed_input() {
        let mut directory = directory();
        let mut input = b"12345 1234\n3 10\n".to_vec();
        input.extend_from_slice(b"\xff\xfe\n3\n\xc3\x28\n5\n5\n");
        let mut output = Vec::new();

        let result =
            Session::new(&mut directory, &input[..], &mut output, LoginPolicy::default()).run();

        assert_eq!(result, Ok(SessionEnd::Quit));
        assert_eq!(directory.balance(12345), Ok(Decimal::from(15)));
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Invalid choice. Please select a valid option.").count(), 1);
        assert_eq!(output.matches("Invalid input. Please enter a number.").count(), 1);
        assert!(output.ends_with("Thank you for using the ATM.\n"));
    }

    #[rstest]
    #[case::negative("-1")]
    #[case::beyond_account_range("99999999999")]
    fn test_out_of_range_user_id_is_invalid_login(#[case] user_id: &str) {
        let mut directory = directory();
        let input = format!("{} 1234\n12345 -1234\n12345 1234\n5\n", user_id);
        let (result, output) = run_session(&mut directory, &input, LoginPolicy::default());

        assert_eq!(result, Ok(SessionEnd::Quit));
        assert_eq!(output.matches("Invalid User ID or PIN. Please try again.").count(), 2);
        assert!(!output.contains("Invalid input"));
    }

    #[rstest]
    #[case::word("ten")]
    #[case::fraction_for_integer("1.5")]
    fn test_parse_number_reports_token(#[case] token: &str) {
        assert_eq!(
            parse_number::<AccountId>(token),
            Err(AtmError::invalid_input(token, "a number"))
        );
    }

    #[test]
    fn test_recipient_sees_transfer_in() {
        let mut directory = directory();
        let (sender, _) =
            run_session(&mut directory, "12345 1234\n3 50\n4 67890 20\n5\n", LoginPolicy::default());
        let (recipient, output) =
            run_session(&mut directory, "67890 5678\n1\n5\n", LoginPolicy::default());

        assert_eq!((sender, recipient), (Ok(SessionEnd::Quit), Ok(SessionEnd::Quit)));
        assert!(output.contains(
            "Transaction History:\n\
             Transaction ID: 3, Type: TRANSFER_IN, Amount: $20\n\n"
        ));
    }

    #[test]
    fn test_scenario_through_the_menu() {
        let mut directory = directory();
        let input = "12345 1234\n3 100\n2 150\n4 67890 50\n4 11111 5\n1\n5\n";
        let (result, output) = run_session(&mut directory, input, LoginPolicy::default());

        assert_eq!(result, Ok(SessionEnd::Quit));
        assert!(output.contains("Insufficient balance.\n"));
        assert!(output.contains("Recipient not found.\n"));
        assert!(output.contains(
            "Transaction History:\n\
             Transaction ID: 1, Type: DEPOSIT, Amount: $100\n\
             Transaction ID: 2, Type: TRANSFER_OUT, Amount: $50\n"
        ));
        assert!(output.ends_with("Thank you for using the ATM.\n"));

        assert_eq!(directory.balance(12345), Ok(Decimal::from(50)));
        assert_eq!(directory.balance(67890), Ok(Decimal::from(50)));
        let recipient_kinds: Vec<_> = directory
            .history(67890)
            .unwrap()
            .iter()
            .map(|tx| tx.kind)
            .collect();
        assert_eq!(recipient_kinds, vec![TransactionKind::TransferIn]);
    }

    #[test]
    fn test_failures_keep_session_authenticated() {
        let mut directory = directory();
        let mut output = Vec::new();
        let mut session = Session::new(
            &mut directory,
            "12345 1234\n9\n2 1\n3 0\n4 12345 1\n".as_bytes(),
            &mut output,
            LoginPolicy::default(),
        );

        session.step().unwrap();
        for _ in 0..4 {
            assert_eq!(session.step().unwrap(), SessionState::Authenticated(12345));
        }
        assert_eq!(
            session.step().unwrap(),
            SessionState::Terminated(SessionEnd::EndOfInput)
        );
        drop(session);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Invalid choice. Please select a valid option.\n"));
        assert!(output.contains("Insufficient balance.\n"));
        assert!(output.contains("Amount must be greater than zero.\n"));
        assert!(output.contains("Cannot transfer to your own account.\n"));
    }

    #[test]
    fn test_terminated_state_is_final() {
        let mut directory = directory();
        let mut output = Vec::new();
        let mut session = Session::new(
            &mut directory,
            "12345 1234 5".as_bytes(),
            &mut output,
            LoginPolicy::default(),
        );

        assert_eq!(session.run(), Ok(SessionEnd::Quit));
        assert_eq!(
            session.step().unwrap(),
            SessionState::Terminated(SessionEnd::Quit)
        );
    }

    #[test]
    fn test_concurrent_sessions_on_shared_directory() {
        let shared = SharedDirectory::new();
        for seed in DEFAULT_ACCOUNTS {
            shared.register(seed.id, seed.pin).unwrap();
        }
        shared.deposit(12345, Decimal::from(100)).unwrap();
        shared.deposit(67890, Decimal::from(100)).unwrap();

        let first = "12345 1234\n".to_string() + &"4 67890 1\n".repeat(50) + "5\n";
        let second = "67890 5678\n".to_string() + &"4 12345 1\n".repeat(50) + "5\n";

        thread::scope(|scope| {
            for input in [&first, &second] {
                let shared = &shared;
                scope.spawn(move || {
                    let mut output = Vec::new();
                    let end = Session::new(shared, input.as_bytes(), &mut output, LoginPolicy::default())
                        .run()
                        .unwrap();
                    assert_eq!(end, SessionEnd::Quit);
                });
            }
        });

        assert_eq!(shared.balance(12345), Ok(Decimal::from(100)));
        assert_eq!(shared.balance(67890), Ok(Decimal::from(100)));
        assert_eq!(shared.history(12345).unwrap().len(), 101);
    }
}
