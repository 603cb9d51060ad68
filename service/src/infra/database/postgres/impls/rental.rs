//! [`Rental`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{game, rental, Rental},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<rental::Id, Rental>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[rental::Id]>,
{
    type Ok = HashMap<rental::Id, Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<rental::Id, Rental>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[rental::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, customer_id, game_id, \
                   rent_date, days_rented, \
                   original_price, \
                   return_date, delay_fee \
            FROM rentals \
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
                    Rental {
                        id,
                        customer_id: row.get("customer_id"),
                        game_id: row.get("game_id"),
                        rent_date: row.get("rent_date"),
                        days_rented: row.get("days_rented"),
                        original_price: row.get("original_price"),
                        return_date: row.get("return_date"),
                        delay_fee: row.get("delay_fee"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Rental>, rental::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<rental::Id, Rental>, [rental::Id; 1]>>,
        Ok = HashMap<rental::Id, Rental>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<read::rental::ActiveCount, game::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::ActiveCount, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let game_id: game::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT8 \
            FROM rentals \
            WHERE game_id = $1::UUID \
              AND return_date IS NULL";
        self.query_opt(SQL, &[&game_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl<C> Database<Insert<Rental>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(rental)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            customer_id,
            game_id,
            rent_date,
            days_rented,
            original_price,
            return_date,
            delay_fee,
        } = rental;

        // Only the finalization outcome is updatable: the rented game, the
        // dates and the original price never change once written.
        const SQL: &str = "\
            INSERT INTO rentals (\
                id, customer_id, game_id, \
                rent_date, days_rented, \
                original_price, \
                return_date, delay_fee\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::INT4, \
                $6::INT8, \
                $7::DATE, $8::INT8\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET return_date = EXCLUDED.return_date, \
                delay_fee = EXCLUDED.delay_fee";
        self.exec(
            SQL,
            &[
                &id,
                &customer_id,
                &game_id,
                &rent_date,
                &days_rented,
                &original_price,
                &return_date,
                &delay_fee,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(rental): Delete<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            DELETE FROM rentals \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&rental.id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Rental, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rental::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO rentals_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::rental::list::Page, read::rental::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rental::list::Page, read::rental::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Selector {
            arguments,
            filter:
                read::rental::list::Filter {
                    customer_id,
                    game_id,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let customer_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let game_idx = game_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let mut conditions = Vec::with_capacity(3);
        if let Some(idx) = cursor_idx {
            let op = arguments.kind().operator();
            conditions.push(format!("id {op} ${idx}::UUID"));
        }
        if let Some(idx) = customer_idx {
            conditions.push(format!("customer_id = ${idx}::UUID"));
        }
        if let Some(idx) = game_idx {
            conditions.push(format!("game_id = ${idx}::UUID"));
        }

        let sql = format!(
            "SELECT id \
             FROM rentals \
             {filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            filtering = if conditions.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", conditions.iter().join(" AND "))
            },
            order = arguments.kind().order().sql(),
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

        Ok(read::rental::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::rental::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::rental::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM rentals";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
