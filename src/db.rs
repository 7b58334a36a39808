use anyhow::Context;
use sqlx::MySqlPool;

/// Tables are created on startup; every dependent table cascades on employee delete.
const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id CHAR(36) NOT NULL PRIMARY KEY,
        full_name VARCHAR(255) NOT NULL,
        registration_number VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        position VARCHAR(255) NOT NULL,
        observations TEXT NULL,
        UNIQUE KEY uq_employees_registration (registration_number)
    ) ENGINE=InnoDB
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hours_bank_entries (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id CHAR(36) NOT NULL,
        month INT NOT NULL,
        year INT NOT NULL,
        minutes BIGINT NOT NULL,
        description TEXT NULL,
        CONSTRAINT fk_hours_employee FOREIGN KEY (employee_id)
            REFERENCES employees (id) ON DELETE CASCADE
    ) ENGINE=InnoDB
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vacations (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id CHAR(36) NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'pending',
        notes TEXT NULL,
        CONSTRAINT fk_vacations_employee FOREIGN KEY (employee_id)
            REFERENCES employees (id) ON DELETE CASCADE
    ) ENGINE=InnoDB
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leaves (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id CHAR(36) NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'pending',
        notes TEXT NULL,
        CONSTRAINT fk_leaves_employee FOREIGN KEY (employee_id)
            REFERENCES employees (id) ON DELETE CASCADE
    ) ENGINE=InnoDB
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS paid_days_off (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id CHAR(36) NOT NULL,
        date DATE NOT NULL,
        minutes BIGINT NOT NULL,
        year INT NOT NULL,
        initial_minutes BIGINT NULL,
        CONSTRAINT fk_paid_days_off_employee FOREIGN KEY (employee_id)
            REFERENCES employees (id) ON DELETE CASCADE
    ) ENGINE=InnoDB
    "#,
];

pub async fn init_db(database_url: &str) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .context("Failed to create schema")?;
    }

    Ok(pool)
}
