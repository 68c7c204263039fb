// Chart-of-accounts store
pub mod accounts;

// Grouping / definition hierarchy
pub mod grouping;

// Voucher posting engine
pub mod vouchers;

// Row-level account locking
pub mod locking;

// Default chart-of-accounts seeding at tenant creation
pub mod seeder;
