//! The book: the top-level container of a tally ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Account, AccountId, Amount, BookError, Budget, BudgetStatus, Category, CategoryId,
    Transaction, Transfer,
};

/// All accounts, categories and transfers of one household or project.
///
/// A book has a single currency. Every amount entering the book is checked
/// against it, which keeps balances and budget sums single-currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Display name
    pub name: String,
    /// ISO currency code of every amount in the book
    pub currency: String,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transfers: Vec<Transfer>,
    next_account: u32,
    next_category: u32,
}

impl Book {
    /// Create an empty book.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: currency.into().to_uppercase(),
            accounts: Vec::new(),
            categories: Vec::new(),
            transfers: Vec::new(),
            next_account: 1,
            next_category: 1,
        }
    }

    /// Accounts in creation order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Categories in creation order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Transfers in the order they were made.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Look up an account by id.
    pub fn account(&self, id: AccountId) -> Result<&Account, BookError> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or(BookError::UnknownAccount(id))
    }

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, BookError> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BookError::UnknownAccount(id))
    }

    /// Look up a category by id.
    pub fn category(&self, id: CategoryId) -> Result<&Category, BookError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or(BookError::UnknownCategory(id))
    }

    fn category_mut(&mut self, id: CategoryId) -> Result<&mut Category, BookError> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(BookError::UnknownCategory(id))
    }

    /// Find an account by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_account(&self, name: &str) -> Option<AccountId> {
        let name = name.trim();
        self.accounts
            .iter()
            .find(|a| a.name.to_lowercase() == name.to_lowercase())
            .map(|a| a.id)
    }

    /// Find a category by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_category(&self, name: &str) -> Option<CategoryId> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
            .map(|c| c.id)
    }

    /// Open a new, empty account.
    pub fn open_account(&mut self, name: &str) -> Result<AccountId, BookError> {
        let name = valid_name(name)?;
        if self.find_account(name).is_some() {
            return Err(BookError::DuplicateAccount(name.to_string()));
        }
        let id = AccountId(self.next_account);
        self.next_account += 1;
        self.accounts.push(Account::new(id, name));
        Ok(id)
    }

    /// Rename an account. Changing only the case of its name is allowed.
    pub fn rename_account(&mut self, id: AccountId, name: &str) -> Result<(), BookError> {
        let name = valid_name(name)?;
        if self.find_account(name).is_some_and(|other| other != id) {
            return Err(BookError::DuplicateAccount(name.to_string()));
        }
        self.account_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Remove an account and its transactions.
    ///
    /// Refused while a transfer references the account, since removing it
    /// would change the balance of the other side.
    pub fn remove_account(&mut self, id: AccountId) -> Result<Account, BookError> {
        let account = self.account(id)?;
        let transfers = self.transfers.iter().filter(|t| t.involves(id)).count();
        if transfers > 0 {
            return Err(BookError::AccountInUse {
                name: account.name.clone(),
                transfers,
            });
        }
        let position = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(BookError::UnknownAccount(id))?;
        Ok(self.accounts.remove(position))
    }

    /// Add a new category without a budget.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryId, BookError> {
        let name = valid_name(name)?;
        if self.find_category(name).is_some() {
            return Err(BookError::DuplicateCategory(name.to_string()));
        }
        let id = CategoryId(self.next_category);
        self.next_category += 1;
        self.categories.push(Category::new(id, name));
        Ok(id)
    }

    /// Rename a category.
    pub fn rename_category(&mut self, id: CategoryId, name: &str) -> Result<(), BookError> {
        let name = valid_name(name)?;
        if self.find_category(name).is_some_and(|other| other != id) {
            return Err(BookError::DuplicateCategory(name.to_string()));
        }
        self.category_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Remove a category. Transactions classified under it become uncategorized.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<Category, BookError> {
        let position = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(BookError::UnknownCategory(id))?;
        for txn in self.accounts.iter_mut().flat_map(|a| a.transactions.iter_mut()) {
            if txn.category == Some(id) {
                txn.category = None;
            }
        }
        Ok(self.categories.remove(position))
    }

    /// Record a transaction on an account, returning its position.
    pub fn record(&mut self, account: AccountId, txn: Transaction) -> Result<usize, BookError> {
        self.check_currency(&txn.amount)?;
        if let Some(category) = txn.category {
            self.category(category)?;
        }
        let target = self.account_mut(account)?;
        target.transactions.push(txn);
        let index = target.transactions.len() - 1;
        if let Err(err) = self.balance(account).and_then(|_| self.total_balance()) {
            self.account_mut(account)?.transactions.pop();
            return Err(err);
        }
        Ok(index)
    }

    /// Remove the transaction at `index` from an account.
    pub fn remove_transaction(
        &mut self,
        account: AccountId,
        index: usize,
    ) -> Result<Transaction, BookError> {
        let account = self.account_mut(account)?;
        if index >= account.transactions.len() {
            return Err(BookError::NoSuchTransaction {
                account: account.name.clone(),
                index,
            });
        }
        Ok(account.transactions.remove(index))
    }

    /// Move money between two distinct accounts.
    pub fn transfer(&mut self, transfer: Transfer) -> Result<(), BookError> {
        self.account(transfer.from)?;
        self.account(transfer.to)?;
        if transfer.from == transfer.to {
            return Err(BookError::SameAccount);
        }
        self.check_currency(&transfer.amount)?;
        if !transfer.amount.is_positive() {
            return Err(BookError::NotPositive(transfer.amount));
        }
        let (from, to) = (transfer.from, transfer.to);
        self.transfers.push(transfer);
        if let Err(err) = self.balance(from).and_then(|_| self.balance(to)) {
            self.transfers.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Set or replace the budget of a category.
    pub fn set_budget(&mut self, category: CategoryId, budget: Budget) -> Result<(), BookError> {
        self.check_currency(&budget.limit)?;
        if !budget.limit.is_positive() {
            return Err(BookError::NotPositive(budget.limit));
        }
        self.category_mut(category)?.budget = Some(budget);
        Ok(())
    }

    /// Remove the budget of a category, returning the previous one.
    pub fn clear_budget(&mut self, category: CategoryId) -> Result<Option<Budget>, BookError> {
        Ok(self.category_mut(category)?.budget.take())
    }

    /// Current balance of an account: its transactions plus transfers in,
    /// minus transfers out.
    pub fn balance(&self, id: AccountId) -> Result<Amount, BookError> {
        let account = self.account(id)?;
        let own = account.transactions.iter().map(|t| t.amount.number);
        let moved = self.transfers.iter().filter_map(|t| {
            if t.to == id {
                Some(t.amount.number)
            } else if t.from == id {
                Some(-t.amount.number)
            } else {
                None
            }
        });
        Amount::checked_sum_in(&self.currency, own.chain(moved)).ok_or(BookError::Overflow)
    }

    /// Sum of all account balances. Transfers cancel out.
    pub fn total_balance(&self) -> Result<Amount, BookError> {
        Amount::checked_sum_in(
            &self.currency,
            self.accounts
                .iter()
                .flat_map(|a| a.transactions.iter())
                .map(|t| t.amount.number),
        )
        .ok_or(BookError::Overflow)
    }

    /// Transactions classified under a category, across all accounts.
    pub fn categorized(
        &self,
        category: CategoryId,
    ) -> impl Iterator<Item = (&Account, usize, &Transaction)> {
        self.accounts.iter().flat_map(move |account| {
            account
                .transactions
                .iter()
                .enumerate()
                .filter(move |(_, t)| t.category == Some(category))
                .map(move |(index, t)| (account, index, t))
        })
    }

    /// Net spending in a category within `[from, to)`.
    ///
    /// Spending is the negated sum of the category's transactions, so refunds
    /// (positive amounts) reduce it.
    pub fn spent(
        &self,
        category: CategoryId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Amount, BookError> {
        self.category(category)?;
        let numbers = self
            .categorized(category)
            .filter(|(_, _, t)| t.date >= from && t.date < to)
            .map(|(_, _, t)| -t.amount.number);
        Amount::checked_sum_in(&self.currency, numbers).ok_or(BookError::Overflow)
    }

    /// Budget evaluation for the period containing `date`, or `None` when the
    /// category has no budget.
    pub fn budget_status(
        &self,
        category: CategoryId,
        date: NaiveDate,
    ) -> Result<Option<BudgetStatus>, BookError> {
        let Some(budget) = self.category(category)?.budget.clone() else {
            return Ok(None);
        };
        let (start, end) = budget.period.bounds(date);
        let spent = self.spent(category, start, end)?;
        let remaining = budget
            .limit
            .number
            .checked_sub(spent.number)
            .map(|number| Amount::new(number, &self.currency))
            .ok_or(BookError::Overflow)?;
        Ok(Some(BudgetStatus {
            budget,
            start,
            end,
            spent,
            remaining,
        }))
    }

    fn check_currency(&self, amount: &Amount) -> Result<(), BookError> {
        if amount.currency.eq_ignore_ascii_case(&self.currency) {
            Ok(())
        } else {
            Err(BookError::CurrencyMismatch {
                expected: self.currency.clone(),
                found: amount.clone(),
            })
        }
    }
}

fn valid_name(name: &str) -> Result<&str, BookError> {
    let name = name.trim();
    if name.is_empty() {
        Err(BookError::EmptyName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Period;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn usd(n: rust_decimal::Decimal) -> Amount {
        Amount::new(n, "USD")
    }

    #[test]
    fn test_account_names_are_unique_ignoring_case() {
        let mut book = Book::new("Home", "usd");
        assert_eq!(book.currency, "USD");
        book.open_account("Checking").unwrap();
        assert_eq!(
            book.open_account("  checking "),
            Err(BookError::DuplicateAccount("checking".to_string()))
        );
        assert_eq!(book.open_account("   "), Err(BookError::EmptyName));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        book.remove_account(a).unwrap();
        let b = book.open_account("B").unwrap();
        assert_ne!(a, b);
        assert!(book.account(a).is_err());
    }

    #[test]
    fn test_rename_allows_case_change() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("savings").unwrap();
        book.open_account("Checking").unwrap();
        book.rename_account(a, "Savings").unwrap();
        assert_eq!(book.account(a).unwrap().name, "Savings");
        assert!(matches!(
            book.rename_account(a, "CHECKING"),
            Err(BookError::DuplicateAccount(_))
        ));
    }

    #[test]
    fn test_record_checks_currency_and_category() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("Checking").unwrap();
        let err = book
            .record(a, Transaction::new(date(2024, 1, 1), Amount::new(dec!(1), "EUR")))
            .unwrap_err();
        assert!(matches!(err, BookError::CurrencyMismatch { .. }));

        let err = book
            .record(
                a,
                Transaction::new(date(2024, 1, 1), usd(dec!(1))).with_category(CategoryId(9)),
            )
            .unwrap_err();
        assert_eq!(err, BookError::UnknownCategory(CategoryId(9)));
    }

    #[test]
    fn test_balance_includes_transfers() {
        let mut book = Book::new("Home", "USD");
        let checking = book.open_account("Checking").unwrap();
        let savings = book.open_account("Savings").unwrap();
        book.record(checking, Transaction::new(date(2024, 1, 1), usd(dec!(1000))))
            .unwrap();
        book.transfer(Transfer::new(date(2024, 1, 2), checking, savings, usd(dec!(250))))
            .unwrap();

        assert_eq!(book.balance(checking).unwrap().number, dec!(750));
        assert_eq!(book.balance(savings).unwrap().number, dec!(250));
        assert_eq!(book.total_balance().unwrap().number, dec!(1000));
    }

    #[test]
    fn test_record_refuses_overflowing_balance() {
        let mut book = Book::new("Home", "USD");
        let cash = book.open_account("Cash").unwrap();
        let savings = book.open_account("Savings").unwrap();
        let huge = dec!(50000000000000000000000000000);
        let day = date(2024, 1, 1);

        book.record(cash, Transaction::new(day, usd(huge))).unwrap();
        assert_eq!(
            book.record(cash, Transaction::new(day, usd(huge))),
            Err(BookError::Overflow)
        );
        // The total is checked too, not only the account.
        assert_eq!(
            book.record(savings, Transaction::new(day, usd(huge))),
            Err(BookError::Overflow)
        );
        assert_eq!(book.account(cash).unwrap().transactions.len(), 1);
        assert!(book.account(savings).unwrap().transactions.is_empty());
        assert_eq!(book.balance(cash).unwrap().number, huge);
        assert_eq!(book.total_balance().unwrap().number, huge);

        book.record(savings, Transaction::new(day, usd(-huge))).unwrap();
        assert_eq!(
            book.transfer(Transfer::new(day, savings, cash, usd(huge))),
            Err(BookError::Overflow)
        );
        assert!(book.transfers().is_empty());
    }

    #[test]
    fn test_transfer_validation() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        let b = book.open_account("B").unwrap();
        let day = date(2024, 1, 1);
        assert_eq!(
            book.transfer(Transfer::new(day, a, a, usd(dec!(5)))),
            Err(BookError::SameAccount)
        );
        assert_eq!(
            book.transfer(Transfer::new(day, a, b, usd(dec!(0)))),
            Err(BookError::NotPositive(usd(dec!(0))))
        );
        assert_eq!(
            book.transfer(Transfer::new(day, a, AccountId(77), usd(dec!(5)))),
            Err(BookError::UnknownAccount(AccountId(77)))
        );
    }

    #[test]
    fn test_account_in_transfer_cannot_be_removed() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        let b = book.open_account("B").unwrap();
        book.transfer(Transfer::new(date(2024, 1, 1), a, b, usd(dec!(5))))
            .unwrap();
        assert_eq!(
            book.remove_account(b),
            Err(BookError::AccountInUse {
                name: "B".to_string(),
                transfers: 1
            })
        );
    }

    #[test]
    fn test_remove_category_uncategorizes() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        let food = book.add_category("Food").unwrap();
        book.record(
            a,
            Transaction::new(date(2024, 1, 1), usd(dec!(-5))).with_category(food),
        )
        .unwrap();
        book.remove_category(food).unwrap();
        assert_eq!(book.account(a).unwrap().transactions[0].category, None);
    }

    #[test]
    fn test_budget_status_for_period() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        let food = book.add_category("Food").unwrap();
        book.set_budget(food, Budget::new(usd(dec!(100)), Period::Monthly))
            .unwrap();
        for (day, n) in [(1, dec!(-30)), (15, dec!(-50)), (20, dec!(10))] {
            book.record(
                a,
                Transaction::new(date(2024, 3, day), usd(n)).with_category(food),
            )
            .unwrap();
        }
        // Outside the period
        book.record(
            a,
            Transaction::new(date(2024, 4, 1), usd(dec!(-500))).with_category(food),
        )
        .unwrap();

        let status = book.budget_status(food, date(2024, 3, 31)).unwrap().unwrap();
        assert_eq!(status.start, date(2024, 3, 1));
        assert_eq!(status.end, date(2024, 4, 1));
        assert_eq!(status.spent.number, dec!(70));
        assert_eq!(status.remaining.number, dec!(30));
        assert!(!status.is_over());

        let april = book.budget_status(food, date(2024, 4, 2)).unwrap().unwrap();
        assert!(april.is_over());
    }

    #[test]
    fn test_budget_requires_positive_limit() {
        let mut book = Book::new("Home", "USD");
        let food = book.add_category("Food").unwrap();
        assert!(book
            .set_budget(food, Budget::new(usd(dec!(-1)), Period::Weekly))
            .is_err());
        assert_eq!(book.budget_status(food, date(2024, 1, 1)).unwrap(), None);
        assert_eq!(book.clear_budget(food).unwrap(), None);
    }

    #[test]
    fn test_remove_transaction_out_of_range() {
        let mut book = Book::new("Home", "USD");
        let a = book.open_account("A").unwrap();
        assert_eq!(
            book.remove_transaction(a, 0),
            Err(BookError::NoSuchTransaction {
                account: "A".to_string(),
                index: 0
            })
        );
    }
}
