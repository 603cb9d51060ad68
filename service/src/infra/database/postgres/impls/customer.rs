//! [`Customer`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<customer::Id, Customer>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[customer::Id]>,
{
    type Ok = HashMap<customer::Id, Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<customer::Id, Customer>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[customer::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, name, phone, cpf, created_at \
            FROM customers \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Customer {
                        id,
                        name: row.get("name"),
                        phone: row.get("phone"),
                        cpf: row.get("cpf"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<customer::Id, Customer>, [customer::Id; 1]>>,
        Ok = HashMap<customer::Id, Customer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'c, C> Database<Select<By<Option<Customer>, &'c customer::Cpf>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Customer>, customer::Id>>,
        Ok = Option<Customer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, &'c customer::Cpf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let cpf = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM customers \
            WHERE cpf = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&cpf])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let customer_id = row.get("id");
        self.execute(Select(By::new(customer_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            name,
            phone,
            cpf,
            created_at,
        } = customer;

        const SQL: &str = "\
            INSERT INTO customers (id, name, phone, cpf, created_at) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::TIMESTAMPTZ\
            )";
        self.exec(SQL, &[&id, &name, &phone, &cpf, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::customer::list::Page, read::customer::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::customer::list::Page, read::customer::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::customer::list::Selector {
            arguments,
            filter: read::customer::list::Filter { name },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let name_idx = name.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let mut conditions = Vec::with_capacity(2);
        if let Some(idx) = cursor_idx {
            let op = arguments.kind().operator();
            conditions.push(format!("id {op} ${idx}::UUID"));
        }
        if let Some(idx) = name_pattern_idx {
            conditions.push(format!(
                "LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR)"
            ));
        }

        let sql = format!(
            "SELECT id \
             FROM customers \
             {filtering} \
             ORDER BY {name_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            filtering = if conditions.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", conditions.iter().join(" AND "))
            },
            order = arguments.kind().order().sql(),
            name_ordering = name_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(name, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
            }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::customer::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::customer::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::customer::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM customers";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
