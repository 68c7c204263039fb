use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_groupings_table::Migration),
            Box::new(m20240101_000002_create_definitions_table::Migration),
            Box::new(m20240101_000003_create_accounts_table::Migration),
            Box::new(m20240101_000004_create_journal_vouchers_table::Migration),
            Box::new(m20240101_000005_create_journal_voucher_entries_table::Migration),
        ]
    }
}

mod m20240101_000001_create_groupings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_groupings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Groupings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Groupings::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Groupings::OrganizationId).uuid().not_null())
                        .col(ColumnDef::new(Groupings::BranchId).uuid().not_null())
                        .col(ColumnDef::new(Groupings::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Groupings::Description).text().not_null())
                        .col(ColumnDef::new(Groupings::FromCode).decimal().not_null())
                        .col(ColumnDef::new(Groupings::ToCode).decimal().not_null())
                        .col(ColumnDef::new(Groupings::Debit).decimal().not_null())
                        .col(ColumnDef::new(Groupings::Credit).decimal().not_null())
                        .col(
                            ColumnDef::new(Groupings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Groupings::CreatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Groupings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Groupings::UpdatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Groupings::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Groupings::DeletedById).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_grouping_org_branch")
                        .table(Groupings::Table)
                        .col(Groupings::OrganizationId)
                        .col(Groupings::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Groupings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Groupings {
        #[sea_orm(iden = "general_ledger_accounts_groupings")]
        Table,
        Id,
        OrganizationId,
        BranchId,
        Name,
        Description,
        FromCode,
        ToCode,
        Debit,
        Credit,
        CreatedAt,
        CreatedById,
        UpdatedAt,
        UpdatedById,
        DeletedAt,
        DeletedById,
    }
}

mod m20240101_000002_create_definitions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_definitions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Definitions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Definitions::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Definitions::OrganizationId).uuid().not_null())
                        .col(ColumnDef::new(Definitions::BranchId).uuid().not_null())
                        .col(ColumnDef::new(Definitions::GroupingId).uuid().not_null())
                        .col(ColumnDef::new(Definitions::ParentDefinitionId).uuid().null())
                        .col(ColumnDef::new(Definitions::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Definitions::NameInTotal)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Definitions::Description).text().not_null())
                        .col(ColumnDef::new(Definitions::Index).integer().not_null())
                        .col(ColumnDef::new(Definitions::IsPosting).boolean().not_null())
                        .col(
                            ColumnDef::new(Definitions::GeneralLedgerType)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Definitions::BeginningBalanceDebit)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Definitions::BeginningBalanceCredit)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Definitions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Definitions::CreatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Definitions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Definitions::UpdatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Definitions::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Definitions::DeletedById).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_definition_org_branch")
                        .table(Definitions::Table)
                        .col(Definitions::OrganizationId)
                        .col(Definitions::BranchId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_definition_grouping")
                        .table(Definitions::Table)
                        .col(Definitions::GroupingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Definitions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Definitions {
        #[sea_orm(iden = "general_ledger_definitions")]
        Table,
        Id,
        OrganizationId,
        BranchId,
        GroupingId,
        ParentDefinitionId,
        Name,
        NameInTotal,
        Description,
        Index,
        IsPosting,
        GeneralLedgerType,
        BeginningBalanceDebit,
        BeginningBalanceCredit,
        CreatedAt,
        CreatedById,
        UpdatedAt,
        UpdatedById,
        DeletedAt,
        DeletedById,
    }
}

mod m20240101_000003_create_accounts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_accounts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Accounts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Accounts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Accounts::OrganizationId).uuid().not_null())
                        .col(ColumnDef::new(Accounts::BranchId).uuid().not_null())
                        .col(ColumnDef::new(Accounts::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Accounts::Description).text().not_null())
                        .col(ColumnDef::new(Accounts::AccountType).string_len(50).not_null())
                        .col(
                            ColumnDef::new(Accounts::GeneralLedgerType)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::ComputationType)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::CurrencyId).uuid().not_null())
                        .col(ColumnDef::new(Accounts::MinAmount).decimal().not_null())
                        .col(ColumnDef::new(Accounts::MaxAmount).decimal().not_null())
                        .col(ColumnDef::new(Accounts::Index).integer().not_null())
                        .col(ColumnDef::new(Accounts::InterestStandard).decimal().not_null())
                        .col(ColumnDef::new(Accounts::InterestSecured).decimal().not_null())
                        .col(ColumnDef::new(Accounts::FinesAmortization).decimal().not_null())
                        .col(ColumnDef::new(Accounts::FinesMaturity).decimal().not_null())
                        .col(
                            ColumnDef::new(Accounts::GracePeriodDailyAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodDailyMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodWeeklyAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodWeeklyMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodMonthlyAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodMonthlyMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodSemiMonthlyAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodSemiMonthlyMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodQuarterlyAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodQuarterlyMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodSemiAnnualAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodSemiAnnualMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodLumpsumAmortization)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::GracePeriodLumpsumMaturity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::LumpsumComputationType)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::DiminishingInterestMode)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::EarnedUnearnedInterest)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::LoanSavingType).string_len(50).not_null())
                        .col(
                            ColumnDef::new(Accounts::InterestDeduction)
                                .string_len(10)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounts::OtherDeductionEntry)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::AlternativeAccountId).uuid().null())
                        .col(ColumnDef::new(Accounts::GeneralLedgerDefinitionId).uuid().null())
                        .col(ColumnDef::new(Accounts::AccountClassificationId).uuid().null())
                        .col(ColumnDef::new(Accounts::AccountCategoryId).uuid().null())
                        .col(ColumnDef::new(Accounts::ComputationSheetId).uuid().null())
                        .col(ColumnDef::new(Accounts::AllowWithdraw).boolean().not_null())
                        .col(ColumnDef::new(Accounts::AllowDeposit).boolean().not_null())
                        .col(ColumnDef::new(Accounts::AllowJournal).boolean().not_null())
                        .col(ColumnDef::new(Accounts::AllowPayment).boolean().not_null())
                        .col(ColumnDef::new(Accounts::AllowAdjustment).boolean().not_null())
                        .col(
                            ColumnDef::new(Accounts::AllowJournalVoucher)
                                .boolean()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::AllowCheckVoucher).boolean().not_null())
                        .col(
                            ColumnDef::new(Accounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::CreatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Accounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounts::UpdatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Accounts::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Accounts::DeletedById).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_account_org_branch")
                        .table(Accounts::Table)
                        .col(Accounts::OrganizationId)
                        .col(Accounts::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Accounts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Accounts {
        Table,
        Id,
        OrganizationId,
        BranchId,
        Name,
        Description,
        AccountType,
        GeneralLedgerType,
        ComputationType,
        CurrencyId,
        MinAmount,
        MaxAmount,
        Index,
        InterestStandard,
        InterestSecured,
        FinesAmortization,
        FinesMaturity,
        GracePeriodDailyAmortization,
        GracePeriodDailyMaturity,
        GracePeriodWeeklyAmortization,
        GracePeriodWeeklyMaturity,
        GracePeriodMonthlyAmortization,
        GracePeriodMonthlyMaturity,
        GracePeriodSemiMonthlyAmortization,
        GracePeriodSemiMonthlyMaturity,
        GracePeriodQuarterlyAmortization,
        GracePeriodQuarterlyMaturity,
        GracePeriodSemiAnnualAmortization,
        GracePeriodSemiAnnualMaturity,
        GracePeriodLumpsumAmortization,
        GracePeriodLumpsumMaturity,
        LumpsumComputationType,
        DiminishingInterestMode,
        EarnedUnearnedInterest,
        LoanSavingType,
        InterestDeduction,
        OtherDeductionEntry,
        AlternativeAccountId,
        GeneralLedgerDefinitionId,
        AccountClassificationId,
        AccountCategoryId,
        ComputationSheetId,
        AllowWithdraw,
        AllowDeposit,
        AllowJournal,
        AllowPayment,
        AllowAdjustment,
        AllowJournalVoucher,
        AllowCheckVoucher,
        CreatedAt,
        CreatedById,
        UpdatedAt,
        UpdatedById,
        DeletedAt,
        DeletedById,
    }
}

mod m20240101_000004_create_journal_vouchers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_journal_vouchers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JournalVouchers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JournalVouchers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::OrganizationId).uuid().not_null())
                        .col(ColumnDef::new(JournalVouchers::BranchId).uuid().not_null())
                        .col(ColumnDef::new(JournalVouchers::CurrencyId).uuid().not_null())
                        .col(ColumnDef::new(JournalVouchers::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(JournalVouchers::VoucherNumber)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JournalVouchers::CashVoucherNumber)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JournalVouchers::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::Description).text().not_null())
                        .col(
                            ColumnDef::new(JournalVouchers::Reference)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::Status).string_len(50).not_null())
                        .col(ColumnDef::new(JournalVouchers::PrintNumber).integer().not_null())
                        .col(
                            ColumnDef::new(JournalVouchers::PrintedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::PrintedById).uuid().null())
                        .col(
                            ColumnDef::new(JournalVouchers::ApprovedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::ApprovedById).uuid().null())
                        .col(
                            ColumnDef::new(JournalVouchers::ReleasedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::ReleasedById).uuid().null())
                        .col(
                            ColumnDef::new(JournalVouchers::PostedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::PostedById).uuid().null())
                        .col(
                            ColumnDef::new(JournalVouchers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::CreatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(JournalVouchers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::UpdatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(JournalVouchers::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(JournalVouchers::DeletedById).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_journal_voucher_org_branch")
                        .table(JournalVouchers::Table)
                        .col(JournalVouchers::OrganizationId)
                        .col(JournalVouchers::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JournalVouchers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum JournalVouchers {
        Table,
        Id,
        OrganizationId,
        BranchId,
        CurrencyId,
        Name,
        VoucherNumber,
        CashVoucherNumber,
        Date,
        Description,
        Reference,
        Status,
        PrintNumber,
        PrintedDate,
        PrintedById,
        ApprovedDate,
        ApprovedById,
        ReleasedDate,
        ReleasedById,
        PostedAt,
        PostedById,
        CreatedAt,
        CreatedById,
        UpdatedAt,
        UpdatedById,
        DeletedAt,
        DeletedById,
    }
}

mod m20240101_000005_create_journal_voucher_entries_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_journal_voucher_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Entries::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Entries::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Entries::OrganizationId).uuid().not_null())
                        .col(ColumnDef::new(Entries::BranchId).uuid().not_null())
                        .col(ColumnDef::new(Entries::JournalVoucherId).uuid().not_null())
                        .col(ColumnDef::new(Entries::AccountId).uuid().not_null())
                        .col(ColumnDef::new(Entries::MemberProfileId).uuid().null())
                        .col(ColumnDef::new(Entries::EmployeeUserId).uuid().null())
                        .col(ColumnDef::new(Entries::Description).text().not_null())
                        .col(ColumnDef::new(Entries::Debit).decimal().not_null())
                        .col(ColumnDef::new(Entries::Credit).decimal().not_null())
                        .col(ColumnDef::new(Entries::Index).integer().not_null())
                        .col(
                            ColumnDef::new(Entries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Entries::CreatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Entries::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Entries::UpdatedById).uuid().not_null())
                        .col(
                            ColumnDef::new(Entries::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Entries::DeletedById).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_entry_voucher")
                        .table(Entries::Table)
                        .col(Entries::JournalVoucherId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Entries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Entries {
        #[sea_orm(iden = "journal_voucher_entries")]
        Table,
        Id,
        OrganizationId,
        BranchId,
        JournalVoucherId,
        AccountId,
        MemberProfileId,
        EmployeeUserId,
        Description,
        Debit,
        Credit,
        Index,
        CreatedAt,
        CreatedById,
        UpdatedAt,
        UpdatedById,
        DeletedAt,
        DeletedById,
    }
}
