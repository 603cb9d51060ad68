//! [`Game`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{game, Game},
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

impl<C, IDs> Database<Select<By<HashMap<game::Id, Game>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[game::Id]>,
{
    type Ok = HashMap<game::Id, Game>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<game::Id, Game>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[game::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, name, image, \
                   stock_total, price_per_day, \
                   created_at \
            FROM games \
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
                    Game {
                        id,
                        name: row.get("name"),
                        image: row.get("image"),
                        stock_total: row.get("stock_total"),
                        price_per_day: row.get("price_per_day"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Game>, game::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<game::Id, Game>, [game::Id; 1]>>,
        Ok = HashMap<game::Id, Game>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Game>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Game>, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'n, C> Database<Select<By<Option<Game>, &'n game::Name>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Game>, game::Id>>,
        Ok = Option<Game>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Game>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Game>, &'n game::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM games \
            WHERE name = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&name])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let game_id = row.get("id");
        self.execute(Select(By::new(game_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Game>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(game): Insert<Game>,
    ) -> Result<Self::Ok, Self::Err> {
        let Game {
            id,
            name,
            image,
            stock_total,
            price_per_day,
            created_at,
        } = game;

        const SQL: &str = "\
            INSERT INTO games (\
                id, name, image, \
                stock_total, price_per_day, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::INT4, $5::INT8, \
                $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &name, &image, &stock_total, &price_per_day, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Game, game::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Game, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: game::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO games_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::game::list::Page, read::game::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::game::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::game::list::Page, read::game::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::game::list::Selector {
            arguments,
            filter: read::game::list::Filter { name },
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
             FROM games \
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

        Ok(read::game::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::game::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::game::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::game::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM games";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
