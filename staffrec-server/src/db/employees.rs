//! Employee aggregate persistence
//!
//! The aggregate spans the employee row plus its topic, post, currency and
//! title lookup rows. Lookup rows are get-or-created inside the same
//! transaction as the employee write; titles attach through the
//! employee_title join table. Unique-constraint violations surface as
//! field-level wrong-data errors, not opaque database errors, so the
//! client can highlight the offending input.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use staffrec_common::api::types::{Employee, EmployeeIn, EmployeeSearch, FieldError, Salary};
use staffrec_common::validate::capitalize;
use staffrec_common::{Error, Result};

const SELECT_EMPLOYEE: &str = "\
    SELECT e.id, e.name, e.surname, e.patronymic, e.department_number, \
           e.service_number, e.employment_date, \
           t.name AS topic_name, t.number AS topic_number, \
           p.code AS post_code, p.name AS post_name, \
           e.salary_amount, c.name AS currency \
    FROM employee e \
    JOIN topic t ON t.id = e.topic_id \
    JOIN post p ON p.id = e.post_id \
    JOIN currency c ON c.id = e.currency_id";

/// Insert a validated employee aggregate, returning the stored record
pub async fn create_employee(pool: &SqlitePool, employee: &EmployeeIn) -> Result<Employee> {
    let mut tx = pool.begin().await?;
    let id = insert_employee(&mut tx, employee).await?;
    tx.commit().await?;

    get_employee(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("employee {} vanished after insert", id)))
}

/// Load one employee aggregate
pub async fn get_employee(pool: &SqlitePool, id: i64) -> Result<Option<Employee>> {
    let sql = format!("{} WHERE e.id = ?", SELECT_EMPLOYEE);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    match row {
        Some(row) => {
            let mut employee = row_to_employee(&row);
            employee.titles = load_titles(pool, id).await?;
            Ok(Some(employee))
        }
        None => Ok(None),
    }
}

/// List employees ordered by id. A negative `limit` means no limit
/// (SQLite semantics).
pub async fn list_employees(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Employee>> {
    let sql = format!("{} ORDER BY e.id LIMIT ? OFFSET ?", SELECT_EMPLOYEE);
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(skip.max(0))
        .fetch_all(pool)
        .await?;
    attach_titles(pool, rows).await
}

/// Replace an employee aggregate. Returns `None` if the id is unknown.
pub async fn update_employee(
    pool: &SqlitePool,
    id: i64,
    employee: &EmployeeIn,
) -> Result<Option<Employee>> {
    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM employee WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let topic_id = get_or_create_topic(&mut tx, &employee.topic_name, employee.topic_number).await?;
    let post_id = get_or_create_post(&mut tx, employee.post_code, &employee.post_name).await?;
    let currency_id = get_or_create_currency(&mut tx, &employee.salary.currency).await?;

    sqlx::query(
        "UPDATE employee SET name = ?, surname = ?, patronymic = ?, \
         department_number = ?, service_number = ?, employment_date = ?, \
         topic_id = ?, post_id = ?, salary_amount = ?, currency_id = ? \
         WHERE id = ?",
    )
    .bind(&employee.name)
    .bind(&employee.surname)
    .bind(&employee.patronymic)
    .bind(employee.department_number)
    .bind(employee.service_number)
    .bind(employee.employment_date)
    .bind(topic_id)
    .bind(post_id)
    .bind(employee.salary.amount)
    .bind(currency_id)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(service_number_conflict)?;

    sqlx::query("DELETE FROM employee_title WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_titles(&mut tx, id, &employee.titles).await?;

    tx.commit().await?;
    get_employee(pool, id).await
}

/// Delete an employee, returning the removed aggregate snapshot
/// (the undo path recreates the record from it)
pub async fn delete_employee(pool: &SqlitePool, id: i64) -> Result<Option<Employee>> {
    let snapshot = match get_employee(pool, id).await? {
        Some(employee) => employee,
        None => return Ok(None),
    };

    // A concurrent delete may win between the snapshot read and here;
    // report None rather than a snapshot of a row someone else removed
    let result = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(snapshot))
}

/// Search employees; provided filter fields are combined with AND
pub async fn search_employees(
    pool: &SqlitePool,
    search: &EmployeeSearch,
) -> Result<Vec<Employee>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_EMPLOYEE);
    qb.push(" WHERE 1 = 1");

    if let Some(name) = &search.name {
        qb.push(" AND e.name = ").push_bind(capitalize(name));
    }
    if let Some(surname) = &search.surname {
        qb.push(" AND e.surname = ").push_bind(capitalize(surname));
    }
    if let Some(patronymic) = &search.patronymic {
        qb.push(" AND e.patronymic = ").push_bind(capitalize(patronymic));
    }
    if let Some(department) = search.department_number {
        qb.push(" AND e.department_number = ").push_bind(department);
    }
    if let Some(service) = search.service_number {
        qb.push(" AND e.service_number = ").push_bind(service);
    }
    if let Some(topic) = &search.topic_name {
        qb.push(" AND t.name = ").push_bind(topic.trim().to_string());
    }
    if let Some(post) = &search.post_name {
        qb.push(" AND p.name = ").push_bind(post.trim().to_string());
    }
    if let Some(title) = &search.title_name {
        qb.push(
            " AND e.id IN (SELECT et.employee_id FROM employee_title et \
             JOIN title ti ON ti.id = et.title_id WHERE ti.name = ",
        )
        .push_bind(title.trim().to_string())
        .push(")");
    }

    qb.push(" ORDER BY e.id");
    let rows = qb.build().fetch_all(pool).await?;
    attach_titles(pool, rows).await
}

/// The `count` employees with the earliest employment dates
pub async fn longest_tenured_employees(pool: &SqlitePool, count: i64) -> Result<Vec<Employee>> {
    let sql = format!(
        "{} ORDER BY e.employment_date ASC, e.id ASC LIMIT ?",
        SELECT_EMPLOYEE
    );
    let rows = sqlx::query(&sql).bind(count).fetch_all(pool).await?;
    attach_titles(pool, rows).await
}

/// Hire dates of every employee holding the named title
pub async fn title_hire_dates(pool: &SqlitePool, title_name: &str) -> Result<Vec<NaiveDate>> {
    let dates = sqlx::query_scalar(
        "SELECT e.employment_date FROM employee e \
         JOIN employee_title et ON et.employee_id = e.id \
         JOIN title t ON t.id = et.title_id \
         WHERE t.name = ? ORDER BY e.employment_date",
    )
    .bind(title_name.trim())
    .fetch_all(pool)
    .await?;
    Ok(dates)
}

async fn insert_employee(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    employee: &EmployeeIn,
) -> Result<i64> {
    let topic_id = get_or_create_topic(tx, &employee.topic_name, employee.topic_number).await?;
    let post_id = get_or_create_post(tx, employee.post_code, &employee.post_name).await?;
    let currency_id = get_or_create_currency(tx, &employee.salary.currency).await?;

    let result = sqlx::query(
        "INSERT INTO employee (name, surname, patronymic, department_number, \
         service_number, employment_date, topic_id, post_id, salary_amount, currency_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&employee.name)
    .bind(&employee.surname)
    .bind(&employee.patronymic)
    .bind(employee.department_number)
    .bind(employee.service_number)
    .bind(employee.employment_date)
    .bind(topic_id)
    .bind(post_id)
    .bind(employee.salary.amount)
    .bind(currency_id)
    .execute(&mut **tx)
    .await
    .map_err(service_number_conflict)?;

    let id = result.last_insert_rowid();
    insert_titles(tx, id, &employee.titles).await?;
    Ok(id)
}

async fn insert_titles(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    employee_id: i64,
    titles: &[String],
) -> Result<()> {
    for title in titles {
        let title_id = get_or_create_title(&mut *tx, title).await?;
        sqlx::query("INSERT OR IGNORE INTO employee_title (employee_id, title_id) VALUES (?, ?)")
            .bind(employee_id)
            .bind(title_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn get_or_create_topic(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    name: &str,
    number: i64,
) -> Result<i64> {
    let existing: Option<(i64, i64)> =
        sqlx::query_as("SELECT id, number FROM topic WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some((id, existing_number)) = existing {
        if existing_number != number {
            return Err(wrong_data(
                &["topic_number"],
                "topic already exists with a different number",
            ));
        }
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO topic (name, number) VALUES (?, ?)")
        .bind(name)
        .bind(number)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "topic.number") {
                wrong_data(&["topic_number"], "topic number already in use")
            } else {
                e.into()
            }
        })?;
    Ok(result.last_insert_rowid())
}

async fn get_or_create_post(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    code: i64,
    name: &str,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM post WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO post (code, name) VALUES (?, ?)")
        .bind(code)
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn get_or_create_currency(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    code: &str,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM currency WHERE name = ?")
        .bind(code)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO currency (name) VALUES (?)")
        .bind(code)
        .execute(&mut **tx)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn get_or_create_title(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    name: &str,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM title WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO title (name) VALUES (?)")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn load_titles(pool: &SqlitePool, employee_id: i64) -> Result<Vec<String>> {
    let titles = sqlx::query_scalar(
        "SELECT t.name FROM employee_title et \
         JOIN title t ON t.id = et.title_id \
         WHERE et.employee_id = ? ORDER BY t.name",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(titles)
}

async fn attach_titles(pool: &SqlitePool, rows: Vec<SqliteRow>) -> Result<Vec<Employee>> {
    let mut employees = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut employee = row_to_employee(row);
        employee.titles = load_titles(pool, employee.id).await?;
        employees.push(employee);
    }
    Ok(employees)
}

fn row_to_employee(row: &SqliteRow) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        patronymic: row.get("patronymic"),
        department_number: row.get("department_number"),
        service_number: row.get("service_number"),
        employment_date: row.get("employment_date"),
        topic_name: row.get("topic_name"),
        topic_number: row.get("topic_number"),
        post_code: row.get("post_code"),
        post_name: row.get("post_name"),
        salary: Salary {
            amount: row.get("salary_amount"),
            currency: row.get("currency"),
        },
        titles: Vec::new(),
    }
}

fn wrong_data(loc: &[&str], msg: &str) -> Error {
    Error::WrongData(vec![FieldError::new(loc, msg, "value_error.conflict")])
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.message().contains("UNIQUE constraint failed")
                && db_err.message().contains(constraint)
    )
}

fn service_number_conflict(err: sqlx::Error) -> Error {
    if is_unique_violation(&err, "employee.service_number") {
        wrong_data(&["service_number"], "service number already in use")
    } else {
        err.into()
    }
}
