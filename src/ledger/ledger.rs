use tracing::debug;

use crate::errors::{Result, WalletError};

use super::{
    account::{Account, AccountId, Money, Phone},
    favorite::Favorite,
    payment::{Payment, PaymentCategory, PaymentStatus},
};

/// In-memory store of accounts, payments and favorites.
///
/// Collections keep insertion order so exports are deterministic. Lookups are
/// linear scans; ledgers are expected to stay small.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub(crate) next_account_id: AccountId,
    pub(crate) accounts: Vec<Account>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) favorites: Vec<Favorite>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// Identifier most recently handed out (or imported). The next registration gets this plus one.
    pub fn next_account_id(&self) -> AccountId {
        self.next_account_id
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.payments.is_empty() && self.favorites.is_empty()
    }

    /// Registers a zero-balance account under `phone`.
    pub fn register_account(&mut self, phone: impl Into<Phone>) -> Result<Account> {
        let phone = phone.into();
        if self.accounts.iter().any(|account| account.phone == phone) {
            return Err(WalletError::PhoneAlreadyRegistered(phone));
        }

        self.next_account_id += 1;
        let account = Account::new(self.next_account_id, phone);
        debug!(account_id = account.id, phone = %account.phone, "registered account");
        self.accounts.push(account.clone());
        Ok(account)
    }

    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<()> {
        if amount <= 0 {
            return Err(WalletError::AmountMustBePositive);
        }
        let account = self.account_mut(account_id)?;
        account.balance = credit(account.balance, amount)?;
        debug!(account_id, amount, balance = account.balance, "deposit applied");
        Ok(())
    }

    /// Debits `amount` immediately and records an in-progress payment.
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Result<Payment> {
        if amount <= 0 {
            return Err(WalletError::AmountMustBePositive);
        }
        let account = self.account_mut(account_id)?;
        if account.balance < amount {
            return Err(WalletError::NotEnoughBalance {
                available: account.balance,
                requested: amount,
            });
        }
        account.balance -= amount;

        let payment = Payment::new(account_id, amount, category.into());
        debug!(payment_id = %payment.id, account_id, amount, "payment recorded");
        self.payments.push(payment.clone());
        Ok(payment)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<(&Account, usize)> {
        self.accounts
            .iter()
            .enumerate()
            .find(|(_, account)| account.id == account_id)
            .map(|(position, account)| (account, position))
            .ok_or(WalletError::AccountNotFound(account_id))
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<(&Payment, usize)> {
        self.payments
            .iter()
            .enumerate()
            .find(|(_, payment)| payment.id == payment_id)
            .map(|(position, payment)| (payment, position))
            .ok_or_else(|| WalletError::PaymentNotFound(payment_id.to_string()))
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<(&Favorite, usize)> {
        self.favorites
            .iter()
            .enumerate()
            .find(|(_, favorite)| favorite.id == favorite_id)
            .map(|(position, favorite)| (favorite, position))
            .ok_or_else(|| WalletError::FavoriteNotFound(favorite_id.to_string()))
    }

    /// Marks an in-progress payment as failed and refunds its amount.
    pub fn reject(&mut self, payment_id: &str) -> Result<()> {
        let (payment, payment_pos) = self.find_payment_by_id(payment_id)?;
        if !payment.is_in_progress() {
            return Err(WalletError::PaymentAlreadyExecuted(payment_id.to_string()));
        }
        let amount = payment.amount;
        let (account, account_pos) = self.find_account_by_id(payment.account_id)?;
        let refunded = credit(account.balance, amount)?;

        self.payments[payment_pos].status = PaymentStatus::Fail;
        self.accounts[account_pos].balance = refunded;
        debug!(payment_id, amount, "payment rejected");
        Ok(())
    }

    /// Pays again with the original payment's account, amount and category.
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment> {
        let (payment, _) = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (payment.account_id, payment.amount, payment.category.clone());
        self.pay(account_id, amount, category)
    }

    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: impl Into<String>,
    ) -> Result<Favorite> {
        let (payment, _) = self.find_payment_by_id(payment_id)?;
        let favorite = Favorite::from_payment(payment, name);
        debug!(favorite_id = %favorite.id, payment_id, "payment saved as favorite");
        self.favorites.push(favorite.clone());
        Ok(favorite)
    }

    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment> {
        let (favorite, _) = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) =
            (favorite.account_id, favorite.amount, favorite.category.clone());
        self.pay(account_id, amount, category)
    }

    /// Records breaking the ledger invariants. Registration and payments never
    /// produce these; they can only arrive through an import.
    pub fn integrity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (index, account) in self.accounts.iter().enumerate() {
            if let Some(earlier) = self.accounts[..index]
                .iter()
                .find(|other| other.phone == account.phone)
            {
                warnings.push(format!(
                    "account {} shares phone {} with account {}",
                    account.id, account.phone, earlier.id
                ));
            }
            if account.balance < 0 {
                warnings.push(format!(
                    "account {} has negative balance {}",
                    account.id, account.balance
                ));
            }
        }
        for payment in &self.payments {
            if payment.amount <= 0 {
                warnings.push(format!(
                    "payment {} has non-positive amount {}",
                    payment.id, payment.amount
                ));
            }
            if self.find_account_by_id(payment.account_id).is_err() {
                warnings.push(format!(
                    "payment {} references unknown account {}",
                    payment.id, payment.account_id
                ));
            }
        }
        for favorite in &self.favorites {
            if favorite.amount <= 0 {
                warnings.push(format!(
                    "favorite {} has non-positive amount {}",
                    favorite.id, favorite.amount
                ));
            }
            if self.find_account_by_id(favorite.account_id).is_err() {
                warnings.push(format!(
                    "favorite {} references unknown account {}",
                    favorite.id, favorite.account_id
                ));
            }
        }
        warnings
    }

    fn account_mut(&mut self, account_id: AccountId) -> Result<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or(WalletError::AccountNotFound(account_id))
    }
}

fn credit(balance: Money, amount: Money) -> Result<Money> {
    balance
        .checked_add(amount)
        .ok_or(WalletError::BalanceOverflow { balance, amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = "+992000000001";

    fn funded_ledger(amount: Money) -> (Ledger, AccountId) {
        let mut ledger = Ledger::new();
        let account = ledger.register_account(PHONE).unwrap();
        ledger.deposit(account.id, amount).unwrap();
        (ledger, account.id)
    }

    fn balance(ledger: &Ledger, account_id: AccountId) -> Money {
        ledger.find_account_by_id(account_id).unwrap().0.balance
    }

    #[test]
    fn register_rejects_duplicate_phone() {
        let mut ledger = Ledger::new();
        let first = ledger.register_account(PHONE).unwrap();
        let second = ledger.register_account("+992000000002").unwrap();
        assert_ne!(first.id, second.id);

        let err = ledger.register_account(PHONE).unwrap_err();
        assert!(
            matches!(err, WalletError::PhoneAlreadyRegistered(ref phone) if phone.as_str() == PHONE),
            "unexpected error: {err:?}"
        );
        assert_eq!(ledger.accounts().len(), 2);
    }

    #[test]
    fn identifiers_start_at_one_and_increase() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.register_account("a").unwrap().id, 1);
        assert_eq!(ledger.register_account("b").unwrap().id, 2);
        assert_eq!(ledger.next_account_id(), 2);
    }

    #[test]
    fn deposit_checks_amount_before_account() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.deposit(42, -5),
            Err(WalletError::AmountMustBePositive)
        ));
        assert!(matches!(
            ledger.deposit(42, 5),
            Err(WalletError::AccountNotFound(42))
        ));
    }

    #[test]
    fn zero_deposit_leaves_balance_unchanged() {
        let (mut ledger, id) = funded_ledger(100);
        assert!(matches!(
            ledger.deposit(id, 0),
            Err(WalletError::AmountMustBePositive)
        ));
        assert_eq!(balance(&ledger, id), 100);
    }

    #[test]
    fn deposit_overflow_is_refused() {
        let (mut ledger, id) = funded_ledger(Money::MAX);
        let err = ledger.deposit(id, 1).unwrap_err();
        assert!(
            matches!(
                err,
                WalletError::BalanceOverflow {
                    balance: Money::MAX,
                    amount: 1
                }
            ),
            "unexpected error: {err:?}"
        );
        assert_eq!(balance(&ledger, id), Money::MAX);
    }

    #[test]
    fn refund_overflow_keeps_payment_in_progress() {
        let (mut ledger, id) = funded_ledger(10);
        let payment = ledger.pay(id, 10, "auto").unwrap();
        ledger.deposit(id, Money::MAX).unwrap();

        assert!(matches!(
            ledger.reject(&payment.id),
            Err(WalletError::BalanceOverflow { .. })
        ));
        assert!(ledger.payments()[0].is_in_progress());
        assert_eq!(balance(&ledger, id), Money::MAX);
    }

    #[test]
    fn pay_exact_balance_then_overdraft() {
        let (mut ledger, id) = funded_ledger(100);
        let err = ledger.pay(id, 101, "auto").unwrap_err();
        assert!(matches!(
            err,
            WalletError::NotEnoughBalance {
                available: 100,
                requested: 101
            }
        ));
        assert_eq!(balance(&ledger, id), 100);
        assert!(ledger.payments().is_empty());

        ledger.pay(id, 100, "auto").unwrap();
        assert_eq!(balance(&ledger, id), 0);
    }

    #[test]
    fn pay_validation_order() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.pay(7, 0, "auto"),
            Err(WalletError::AmountMustBePositive)
        ));
        assert!(matches!(
            ledger.pay(7, 10, "auto"),
            Err(WalletError::AccountNotFound(7))
        ));
    }

    #[test]
    fn reject_restores_balance_once() {
        let (mut ledger, id) = funded_ledger(100);
        let payment = ledger.pay(id, 50, "auto").unwrap();
        assert_eq!(balance(&ledger, id), 50);
        assert_eq!(payment.status, PaymentStatus::InProgress);

        ledger.reject(&payment.id).unwrap();
        assert_eq!(balance(&ledger, id), 100);
        let (stored, _) = ledger.find_payment_by_id(&payment.id).unwrap();
        assert_eq!(stored.status, PaymentStatus::Fail);

        let err = ledger.reject(&payment.id).unwrap_err();
        assert!(matches!(err, WalletError::PaymentAlreadyExecuted(_)));
        assert_eq!(balance(&ledger, id), 100);
    }

    #[test]
    fn reject_unknown_payment() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.reject("missing"),
            Err(WalletError::PaymentNotFound(ref id)) if id == "missing"
        ));
    }

    #[test]
    fn reject_with_dangling_account_does_not_mutate() {
        let (mut ledger, id) = funded_ledger(100);
        let payment = ledger.pay(id, 40, "auto").unwrap();
        ledger.accounts.clear();

        assert!(matches!(
            ledger.reject(&payment.id),
            Err(WalletError::AccountNotFound(_))
        ));
        assert!(ledger.payments()[0].is_in_progress());
    }

    #[test]
    fn repeat_creates_independent_payment() {
        let (mut ledger, id) = funded_ledger(100);
        let original = ledger.pay(id, 30, "food").unwrap();
        ledger.reject(&original.id).unwrap();

        let repeated = ledger.repeat(&original.id).unwrap();
        assert_ne!(repeated.id, original.id);
        assert_eq!(repeated.account_id, original.account_id);
        assert_eq!(repeated.amount, original.amount);
        assert_eq!(repeated.category, original.category);
        assert_eq!(repeated.status, PaymentStatus::InProgress);
        assert_eq!(balance(&ledger, id), 70);
    }

    #[test]
    fn repeat_propagates_pay_failures() {
        let (mut ledger, id) = funded_ledger(60);
        let original = ledger.pay(id, 50, "food").unwrap();
        assert!(matches!(
            ledger.repeat(&original.id),
            Err(WalletError::NotEnoughBalance { .. })
        ));
        assert!(matches!(
            ledger.repeat("nope"),
            Err(WalletError::PaymentNotFound(_))
        ));
    }

    #[test]
    fn favorite_survives_rejection_of_source() {
        let (mut ledger, id) = funded_ledger(100);
        let payment = ledger.pay(id, 25, "mobile").unwrap();
        let favorite = ledger.favorite_payment(&payment.id, "phone bill").unwrap();
        ledger.reject(&payment.id).unwrap();

        let paid = ledger.pay_from_favorite(&favorite.id).unwrap();
        assert_eq!(paid.account_id, payment.account_id);
        assert_eq!(paid.amount, payment.amount);
        assert_eq!(paid.category, payment.category);
        assert_eq!(favorite.name, "phone bill");
        assert_eq!(balance(&ledger, id), 75);
    }

    #[test]
    fn favorite_lookups_fail_for_unknown_ids() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.favorite_payment("nope", "x"),
            Err(WalletError::PaymentNotFound(_))
        ));
        assert!(matches!(
            ledger.pay_from_favorite("nope"),
            Err(WalletError::FavoriteNotFound(_))
        ));
    }

    #[test]
    fn find_reports_position() {
        let mut ledger = Ledger::new();
        ledger.register_account("a").unwrap();
        let second = ledger.register_account("b").unwrap();
        let (found, position) = ledger.find_account_by_id(second.id).unwrap();
        assert_eq!(found, &second);
        assert_eq!(position, 1);
    }

    #[test]
    fn integrity_warnings_flag_dangling_references() {
        let (mut ledger, id) = funded_ledger(100);
        let payment = ledger.pay(id, 10, "auto").unwrap();
        ledger.favorite_payment(&payment.id, "fav").unwrap();
        assert!(ledger.integrity_warnings().is_empty());

        ledger.accounts.clear();
        let warnings = ledger.integrity_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown account"));
    }

    #[test]
    fn integrity_warnings_flag_broken_balances_and_phones() {
        let mut ledger = Ledger::new();
        ledger.merge_accounts(vec![
            Account {
                id: 1,
                phone: Phone::from(PHONE),
                balance: 0,
            },
            Account {
                id: 2,
                phone: Phone::from(PHONE),
                balance: -50,
            },
        ]);
        ledger.merge_payments(vec![Payment {
            id: "p-0".into(),
            account_id: 1,
            amount: 0,
            category: "auto".into(),
            status: PaymentStatus::InProgress,
        }]);

        let warnings = ledger.integrity_warnings();
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert!(warnings[0].contains("shares phone"));
        assert!(warnings[1].contains("negative balance -50"));
        assert!(warnings[2].contains("non-positive amount 0"));
    }
}
