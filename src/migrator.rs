use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customer_table::Migration),
            Box::new(m20240101_000002_create_building_table::Migration),
            Box::new(m20240101_000003_create_floor_table::Migration),
            Box::new(m20240101_000004_create_customer_building_table::Migration),
            Box::new(m20240101_000005_create_physical_sensor_table::Migration),
            Box::new(m20240101_000006_create_virtual_sensor_table::Migration),
            Box::new(m20240101_000007_create_exit_path_table::Migration),
            Box::new(m20240101_000008_create_qr_code_table::Migration),
            Box::new(m20240101_000009_create_linked_qr_path_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_customer_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_customer_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customer::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customer::CustomerId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Customer::CustomerName).string().not_null())
                        .col(ColumnDef::new(Customer::CustomerEmail).string().not_null())
                        .col(ColumnDef::new(Customer::CustomerPhone).string().null())
                        .col(ColumnDef::new(Customer::CustomerAddress).string().null())
                        .col(ColumnDef::new(Customer::CustomerCity).string().null())
                        .col(ColumnDef::new(Customer::CustomerState).string().null())
                        .col(ColumnDef::new(Customer::CustomerCountry).string().null())
                        .col(
                            ColumnDef::new(Customer::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customer_email_unique")
                        .table(Customer::Table)
                        .col(Customer::CustomerEmail)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // NULL phones never collide on either backend
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customer_phone_unique")
                        .table(Customer::Table)
                        .col(Customer::CustomerPhone)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customer::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Customer {
        Table,
        CustomerId,
        CustomerName,
        CustomerEmail,
        CustomerPhone,
        CustomerAddress,
        CustomerCity,
        CustomerState,
        CustomerCountry,
        CreatedAt,
    }
}

mod m20240101_000002_create_building_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_building_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Building::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Building::BuildingId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Building::BuildingName).string().not_null())
                        .col(ColumnDef::new(Building::NumFloors).integer().null())
                        .col(ColumnDef::new(Building::BuildingAddress).string().null())
                        .col(ColumnDef::new(Building::BuildingCity).string().null())
                        .col(ColumnDef::new(Building::BuildingState).string().null())
                        .col(ColumnDef::new(Building::BuildingCountry).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Building::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Building {
        Table,
        BuildingId,
        BuildingName,
        NumFloors,
        BuildingAddress,
        BuildingCity,
        BuildingState,
        BuildingCountry,
    }
}

mod m20240101_000003_create_floor_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_floor_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Floor::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Floor::FloorId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Floor::BuildingId).integer().not_null())
                        .col(ColumnDef::new(Floor::FloorNumber).integer().not_null())
                        .col(ColumnDef::new(Floor::Description).string().null())
                        .col(
                            ColumnDef::new(Floor::NumSensors)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_floor_building_id")
                                .from(Floor::Table, Floor::BuildingId)
                                .to(Building::Table, Building::BuildingId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_floor_building_id")
                        .table(Floor::Table)
                        .col(Floor::BuildingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Floor::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Floor {
        Table,
        FloorId,
        BuildingId,
        FloorNumber,
        Description,
        NumSensors,
    }

    #[derive(DeriveIden)]
    enum Building {
        Table,
        BuildingId,
    }
}

mod m20240101_000004_create_customer_building_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_customer_building_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CustomerBuilding::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomerBuilding::CustomerBuildingId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CustomerBuilding::CustomerId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerBuilding::BuildingId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CustomerBuilding::StartDate).date().not_null())
                        .col(ColumnDef::new(CustomerBuilding::EndDate).date().not_null())
                        .col(
                            ColumnDef::new(CustomerBuilding::DaysOfSubscription)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerBuilding::SubscriptionStatus)
                                .string_len(20)
                                .not_null()
                                .default("inactive"),
                        )
                        .col(
                            ColumnDef::new(CustomerBuilding::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_building_customer_id")
                                .from(CustomerBuilding::Table, CustomerBuilding::CustomerId)
                                .to(Customer::Table, Customer::CustomerId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_building_building_id")
                                .from(CustomerBuilding::Table, CustomerBuilding::BuildingId)
                                .to(Building::Table, Building::BuildingId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customer_building_pair")
                        .table(CustomerBuilding::Table)
                        .col(CustomerBuilding::CustomerId)
                        .col(CustomerBuilding::BuildingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CustomerBuilding::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CustomerBuilding {
        Table,
        CustomerBuildingId,
        CustomerId,
        BuildingId,
        StartDate,
        EndDate,
        DaysOfSubscription,
        SubscriptionStatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Customer {
        Table,
        CustomerId,
    }

    #[derive(DeriveIden)]
    enum Building {
        Table,
        BuildingId,
    }
}

mod m20240101_000005_create_physical_sensor_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_physical_sensor_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PhysicalSensor::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PhysicalSensor::SensorId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PhysicalSensor::FloorId).integer().not_null())
                        .col(
                            ColumnDef::new(PhysicalSensor::SensorNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PhysicalSensor::Location).string().null())
                        .col(
                            ColumnDef::new(PhysicalSensor::Type)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PhysicalSensor::SensorStatus)
                                .string_len(20)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_physical_sensor_floor_id")
                                .from(PhysicalSensor::Table, PhysicalSensor::FloorId)
                                .to(Floor::Table, Floor::FloorId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_physical_sensor_floor_id")
                        .table(PhysicalSensor::Table)
                        .col(PhysicalSensor::FloorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PhysicalSensor::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PhysicalSensor {
        Table,
        SensorId,
        FloorId,
        SensorNumber,
        Location,
        Type,
        SensorStatus,
    }

    #[derive(DeriveIden)]
    enum Floor {
        Table,
        FloorId,
    }
}

mod m20240101_000006_create_virtual_sensor_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_virtual_sensor_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VirtualSensor::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VirtualSensor::VirtualSensorId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(VirtualSensor::SensorId).integer().not_null())
                        .col(ColumnDef::new(VirtualSensor::FloorId).integer().not_null())
                        .col(
                            ColumnDef::new(VirtualSensor::VirtualSensorNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VirtualSensor::AnimationStatus)
                                .string()
                                .not_null()
                                .default("Normal"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_virtual_sensor_sensor_id")
                                .from(VirtualSensor::Table, VirtualSensor::SensorId)
                                .to(PhysicalSensor::Table, PhysicalSensor::SensorId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_virtual_sensor_floor_id")
                                .from(VirtualSensor::Table, VirtualSensor::FloorId)
                                .to(Floor::Table, Floor::FloorId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_virtual_sensor_floor_id")
                        .table(VirtualSensor::Table)
                        .col(VirtualSensor::FloorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VirtualSensor::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum VirtualSensor {
        Table,
        VirtualSensorId,
        SensorId,
        FloorId,
        VirtualSensorNumber,
        AnimationStatus,
    }

    #[derive(DeriveIden)]
    enum PhysicalSensor {
        Table,
        SensorId,
    }

    #[derive(DeriveIden)]
    enum Floor {
        Table,
        FloorId,
    }
}

mod m20240101_000007_create_exit_path_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_exit_path_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ExitPath::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ExitPath::PathId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ExitPath::FloorId).integer().not_null())
                        .col(ColumnDef::new(ExitPath::StartPoint).string().not_null())
                        .col(ColumnDef::new(ExitPath::EndPoint).string().not_null())
                        .col(ColumnDef::new(ExitPath::PathStatus).string_len(20).not_null())
                        .col(ColumnDef::new(ExitPath::PathLength).double().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_exit_path_floor_id")
                                .from(ExitPath::Table, ExitPath::FloorId)
                                .to(Floor::Table, Floor::FloorId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exit_path_floor_id")
                        .table(ExitPath::Table)
                        .col(ExitPath::FloorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ExitPath::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ExitPath {
        Table,
        PathId,
        FloorId,
        StartPoint,
        EndPoint,
        PathStatus,
        PathLength,
    }

    #[derive(DeriveIden)]
    enum Floor {
        Table,
        FloorId,
    }
}

mod m20240101_000008_create_qr_code_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_qr_code_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(QrCode::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(QrCode::QrCodeId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(QrCode::FloorId).integer().not_null())
                        .col(ColumnDef::new(QrCode::QrCodeNumber).string().not_null())
                        .col(ColumnDef::new(QrCode::InstalledLocation).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_qr_code_floor_id")
                                .from(QrCode::Table, QrCode::FloorId)
                                .to(Floor::Table, Floor::FloorId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_qr_code_floor_id")
                        .table(QrCode::Table)
                        .col(QrCode::FloorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(QrCode::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum QrCode {
        Table,
        QrCodeId,
        FloorId,
        QrCodeNumber,
        InstalledLocation,
    }

    #[derive(DeriveIden)]
    enum Floor {
        Table,
        FloorId,
    }
}

mod m20240101_000009_create_linked_qr_path_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_linked_qr_path_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LinkedQrPath::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LinkedQrPath::LinkId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(LinkedQrPath::QrCodeId).integer().not_null())
                        .col(ColumnDef::new(LinkedQrPath::PathId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_linked_qr_path_qr_code_id")
                                .from(LinkedQrPath::Table, LinkedQrPath::QrCodeId)
                                .to(QrCode::Table, QrCode::QrCodeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_linked_qr_path_path_id")
                                .from(LinkedQrPath::Table, LinkedQrPath::PathId)
                                .to(ExitPath::Table, ExitPath::PathId),
                        )
                        .to_owned(),
                )
                .await?;

            // Backstop for concurrent link requests; inserts use ON CONFLICT DO NOTHING
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_linked_qr_path_pair_unique")
                        .table(LinkedQrPath::Table)
                        .col(LinkedQrPath::QrCodeId)
                        .col(LinkedQrPath::PathId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_linked_qr_path_path_id")
                        .table(LinkedQrPath::Table)
                        .col(LinkedQrPath::PathId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LinkedQrPath::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LinkedQrPath {
        Table,
        LinkId,
        QrCodeId,
        PathId,
    }

    #[derive(DeriveIden)]
    enum QrCode {
        Table,
        QrCodeId,
    }

    #[derive(DeriveIden)]
    enum ExitPath {
        Table,
        PathId,
    }
}
