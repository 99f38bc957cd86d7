//! Business rules for creating and listing expenses.

use time::OffsetDateTime;

use crate::{
    Error,
    expense::{CreateExpenseRequest, Expense},
    id::generate_id,
    stores::{ExpenseStore, StorageError},
    validation::{validate_amount, validate_date},
};

/// The only `sort` value that changes the order of listed expenses.
pub const SORT_DATE_DESC: &str = "date_desc";

/// The shape of query to run against the store when listing expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseQuery<'a> {
    /// Every expense, unordered.
    All,
    /// Expenses in a category, unordered.
    ByCategory(&'a str),
    /// Every expense, newest date first.
    AllSortedByDateDesc,
    /// Expenses in a category, newest date first.
    ByCategorySortedByDateDesc(&'a str),
}

impl<'a> ExpenseQuery<'a> {
    /// Pick the query for the optional `category` and `sort` parameters.
    ///
    /// An empty category is treated as absent, and any `sort` other than
    /// [SORT_DATE_DESC] is treated as no sort.
    pub fn select(category: Option<&'a str>, sort: Option<&str>) -> Self {
        let category = category.filter(|category| !category.is_empty());
        let sort_by_date_desc = sort == Some(SORT_DATE_DESC);

        match (category, sort_by_date_desc) {
            (Some(category), true) => ExpenseQuery::ByCategorySortedByDateDesc(category),
            (Some(category), false) => ExpenseQuery::ByCategory(category),
            (None, true) => ExpenseQuery::AllSortedByDateDesc,
            (None, false) => ExpenseQuery::All,
        }
    }

    /// Run the query against `store`.
    pub fn run<S: ExpenseStore>(self, store: &S) -> Result<Vec<Expense>, StorageError> {
        match self {
            ExpenseQuery::All => store.get_all(),
            ExpenseQuery::ByCategory(category) => store.get_by_category(category),
            ExpenseQuery::AllSortedByDateDesc => store.get_all_sorted_by_date_desc(),
            ExpenseQuery::ByCategorySortedByDateDesc(category) => {
                store.get_by_category_sorted_by_date_desc(category)
            }
        }
    }
}

/// Validates new expenses and decides how to list them.
///
/// The service holds no state of its own besides the store.
#[derive(Debug, Clone)]
pub struct ExpenseService<S> {
    store: S,
}

impl<S: ExpenseStore> ExpenseService<S> {
    /// Create a service backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate `request` and store it as a new expense.
    ///
    /// The fields are stored exactly as given; whitespace around the amount
    /// and date is tolerated by validation but not removed.
    ///
    /// # Errors
    /// Returns:
    /// - the validation error from [validate_amount] or [validate_date],
    /// - [Error::MissingField] if the category or description is empty,
    /// - or [Error::StorageError] if the store fails. The operation is not retried.
    pub fn create_expense(&self, request: CreateExpenseRequest) -> Result<Expense, Error> {
        validate_amount(&request.amount)?;
        validate_date(&request.date)?;

        if request.category.is_empty() {
            return Err(Error::MissingField("category"));
        }

        if request.description.is_empty() {
            return Err(Error::MissingField("description"));
        }

        let expense = Expense {
            id: generate_id(),
            amount: request.amount,
            category: request.category,
            description: request.description,
            date: request.date,
            created_at: OffsetDateTime::now_utc(),
        };

        self.store.create(&expense)?;

        tracing::debug!("created expense {}", expense.id);

        Ok(expense)
    }

    /// List expenses, optionally filtered by `category` and sorted by `sort`.
    ///
    /// See [ExpenseQuery::select] for how the parameters are interpreted.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the store fails.
    pub fn get_expenses(
        &self,
        category: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Vec<Expense>, Error> {
        let query = ExpenseQuery::select(category, sort);

        tracing::debug!("listing expenses with {query:?}");

        query.run(&self.store).map_err(Error::from)
    }
}


#[cfg(test)]
mod expense_service_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{CreateExpenseRequest, Expense, ExpenseService},
        stores::{ExpenseStore, SQLiteExpenseStore, StorageError, TimestampPolicy},
    };

    /// Records which store method was called and keeps created expenses in memory.
    #[derive(Debug, Default)]
    struct RecordingStore {
        expenses: Mutex<Vec<Expense>>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn record(&self, call: String) -> Result<Vec<Expense>, StorageError> {
            self.calls.lock().unwrap().push(call);
            Ok(self.expenses.lock().unwrap().clone())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ExpenseStore for RecordingStore {
        fn create(&self, expense: &Expense) -> Result<(), StorageError> {
            self.calls.lock().unwrap().push("create".to_owned());
            self.expenses.lock().unwrap().push(expense.clone());
            Ok(())
        }

        fn get_all(&self) -> Result<Vec<Expense>, StorageError> {
            self.record("get_all".to_owned())
        }

        fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, StorageError> {
            self.record(format!("get_by_category({category})"))
        }

        fn get_all_sorted_by_date_desc(&self) -> Result<Vec<Expense>, StorageError> {
            self.record("get_all_sorted_by_date_desc".to_owned())
        }

        fn get_by_category_sorted_by_date_desc(
            &self,
            category: &str,
        ) -> Result<Vec<Expense>, StorageError> {
            self.record(format!("get_by_category_sorted_by_date_desc({category})"))
        }
    }

    impl ExpenseStore for Arc<RecordingStore> {
        fn create(&self, expense: &Expense) -> Result<(), StorageError> {
            self.as_ref().create(expense)
        }

        fn get_all(&self) -> Result<Vec<Expense>, StorageError> {
            self.as_ref().get_all()
        }

        fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, StorageError> {
            self.as_ref().get_by_category(category)
        }

        fn get_all_sorted_by_date_desc(&self) -> Result<Vec<Expense>, StorageError> {
            self.as_ref().get_all_sorted_by_date_desc()
        }

        fn get_by_category_sorted_by_date_desc(
            &self,
            category: &str,
        ) -> Result<Vec<Expense>, StorageError> {
            self.as_ref().get_by_category_sorted_by_date_desc(category)
        }
    }

    /// Fails every operation as if the database lock were poisoned.
    struct FailingStore;

    impl ExpenseStore for FailingStore {
        fn create(&self, _expense: &Expense) -> Result<(), StorageError> {
            Err(StorageError::LockError)
        }

        fn get_all(&self) -> Result<Vec<Expense>, StorageError> {
            Err(StorageError::LockError)
        }

        fn get_by_category(&self, _category: &str) -> Result<Vec<Expense>, StorageError> {
            Err(StorageError::LockError)
        }

        fn get_all_sorted_by_date_desc(&self) -> Result<Vec<Expense>, StorageError> {
            Err(StorageError::LockError)
        }

        fn get_by_category_sorted_by_date_desc(
            &self,
            _category: &str,
        ) -> Result<Vec<Expense>, StorageError> {
            Err(StorageError::LockError)
        }
    }

    fn get_recording_service() -> (ExpenseService<Arc<RecordingStore>>, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        (ExpenseService::new(store.clone()), store)
    }

    fn get_sqlite_service() -> ExpenseService<SQLiteExpenseStore> {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        ExpenseService::new(SQLiteExpenseStore::new(
            Arc::new(Mutex::new(connection)),
            TimestampPolicy::Lenient,
        ))
    }

    fn request(amount: &str, category: &str, description: &str, date: &str) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            date: date.to_owned(),
        }
    }

    fn lunch() -> CreateExpenseRequest {
        request("100.50", "Food", "Lunch", "2024-01-15")
    }

    #[test]
    fn create_expense_populates_server_fields() {
        let (service, store) = get_recording_service();

        let expense = service.create_expense(lunch()).expect("Could not create expense");

        assert_eq!(expense.id.len(), 36);
        assert_eq!(expense.amount, "100.50");
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.date, "2024-01-15");
        assert_eq!(store.calls(), ["create"]);
        assert_eq!(*store.expenses.lock().unwrap(), vec![expense]);
    }

    #[test]
    fn create_expense_stores_fields_verbatim() {
        let (service, _) = get_recording_service();

        let expense = service
            .create_expense(request(" 7.10 ", "  food ", " Snack", " 2024-01-15 "))
            .expect("Could not create expense");

        assert_eq!(expense.amount, " 7.10 ");
        assert_eq!(expense.category, "  food ");
        assert_eq!(expense.description, " Snack");
        assert_eq!(expense.date, " 2024-01-15 ");
    }

    #[test]
    fn create_expense_assigns_distinct_ids() {
        let (service, _) = get_recording_service();

        let first = service.create_expense(lunch()).unwrap();
        let second = service.create_expense(lunch()).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_expense_accepts_zero_amount() {
        let (service, _) = get_recording_service();

        let got = service.create_expense(request("0", "Food", "Free lunch", "2024-01-15"));

        assert!(got.is_ok(), "got {got:?}");
    }

    #[test]
    fn create_expense_rejects_invalid_input_without_storing() {
        let cases = [
            (request("-0.01", "Food", "Lunch", "2024-01-15"), Error::NegativeAmount),
            (request("", "Food", "Lunch", "2024-01-15"), Error::EmptyInput("amount")),
            (request("ten", "Food", "Lunch", "2024-01-15"), Error::NotANumber),
            (request("1.00", "Food", "Lunch", ""), Error::EmptyInput("date")),
            (request("1.00", "Food", "Lunch", "15/01/2024"), Error::BadFormat),
            (request("1.00", "", "Lunch", "2024-01-15"), Error::MissingField("category")),
            (request("1.00", "Food", "", "2024-01-15"), Error::MissingField("description")),
        ];

        for (request, want) in cases {
            let (service, store) = get_recording_service();

            let got = service.create_expense(request.clone());

            assert_eq!(got, Err(want), "request {request:?}");
            assert!(store.calls().is_empty(), "store was called for {request:?}");
        }
    }

    #[test]
    fn create_expense_checks_amount_before_date_before_category() {
        let (service, _) = get_recording_service();

        let got = service.create_expense(request("-1", "", "", "bad"));
        assert_eq!(got, Err(Error::NegativeAmount));

        let got = service.create_expense(request("1", "", "", "bad"));
        assert_eq!(got, Err(Error::BadFormat));

        let got = service.create_expense(request("1", "", "", "2024-01-15"));
        assert_eq!(got, Err(Error::MissingField("category")));
    }

    #[test]
    fn whitespace_category_is_not_missing() {
        let (service, _) = get_recording_service();

        let got = service.create_expense(request("1", " ", "Lunch", "2024-01-15"));

        assert!(got.is_ok(), "got {got:?}");
    }

    #[test]
    fn create_expense_wraps_storage_failure() {
        let service = ExpenseService::new(FailingStore);

        let got = service.create_expense(lunch());

        assert_eq!(got, Err(Error::StorageError(StorageError::LockError)));
    }

    #[test]
    fn get_expenses_dispatches_to_store() {
        let cases = [
            (Some("Food"), Some("date_desc"), "get_by_category_sorted_by_date_desc(Food)"),
            (Some("Food"), None, "get_by_category(Food)"),
            (Some("Food"), Some("oldest"), "get_by_category(Food)"),
            (None, Some("date_desc"), "get_all_sorted_by_date_desc"),
            (Some(""), Some("date_desc"), "get_all_sorted_by_date_desc"),
            (None, None, "get_all"),
            (None, Some("nonsense"), "get_all"),
        ];

        for (category, sort, want) in cases {
            let (service, store) = get_recording_service();

            service
                .get_expenses(category, sort)
                .expect("Could not get expenses");

            assert_eq!(store.calls(), [want], "category {category:?}, sort {sort:?}");
        }
    }

    #[test]
    fn get_expenses_wraps_storage_failure() {
        let service = ExpenseService::new(FailingStore);

        let got = service.get_expenses(Some("Food"), Some("date_desc"));

        assert_eq!(got, Err(Error::StorageError(StorageError::LockError)));
    }

    #[test]
    fn created_expense_is_listed_once_with_identical_fields() {
        let service = get_sqlite_service();
        let created = service.create_expense(lunch()).expect("Could not create expense");

        let listed = service.get_expenses(None, None).expect("Could not get expenses");

        assert_eq!(listed.len(), 1);
        let got = &listed[0];
        assert_eq!(got.id, created.id);
        assert_eq!(got.amount, created.amount);
        assert_eq!(got.category, created.category);
        assert_eq!(got.description, created.description);
        assert_eq!(got.date, created.date);
        assert_eq!(got.created_at, created.created_at);
    }

    #[test]
    fn get_expenses_filters_by_category() {
        let service = get_sqlite_service();
        for (amount, category, description, date) in [
            ("100.50", "Food", "Lunch", "2024-01-15"),
            ("50.00", "Transport", "Taxi", "2024-01-14"),
            ("75.25", "Food", "Dinner", "2024-01-16"),
        ] {
            service
                .create_expense(request(amount, category, description, date))
                .expect("Could not create expense");
        }

        let food = service
            .get_expenses(Some("Food"), Some(""))
            .expect("Could not get expenses");
        let none = service
            .get_expenses(Some("NonExistent"), Some(""))
            .expect("Could not get expenses");
        let all = service.get_expenses(None, None).expect("Could not get expenses");

        assert_eq!(food.len(), 2);
        assert!(food.iter().all(|expense| expense.category == "Food"));
        assert_eq!(none, vec![]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn get_expenses_sorts_by_date_desc() {
        let service = get_sqlite_service();
        for date in ["2024-01-15", "2024-01-14", "2024-01-16"] {
            service
                .create_expense(request("1.00", "Food", "Meal", date))
                .expect("Could not create expense");
        }

        let got = service
            .get_expenses(Some(""), Some("date_desc"))
            .expect("Could not get expenses");

        let dates: Vec<&str> = got.iter().map(|expense| expense.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-16", "2024-01-15", "2024-01-14"]);
    }
}
