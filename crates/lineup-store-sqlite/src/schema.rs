//! SQL schema for the Lineup SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! Every table carries `organization_id`; ids are not namespaced by tenant,
//! so every statement filters on it.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS players (
    player_id       TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    date_of_birth   TEXT,            -- YYYY-MM-DD
    nationality     TEXT,
    photo           TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    team_id         TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    name            TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

-- Dates are YYYY-MM-DD, so text comparison is chronological.
CREATE TABLE IF NOT EXISTS seasons (
    season_id       TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    name            TEXT NOT NULL,
    starts_on       TEXT NOT NULL,
    ends_on         TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    CHECK (starts_on <= ends_on)
);

CREATE TABLE IF NOT EXISTS games (
    game_id         TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    season_id       TEXT NOT NULL REFERENCES seasons(season_id),
    home_team_id    TEXT NOT NULL REFERENCES teams(team_id),
    away_team_id    TEXT NOT NULL REFERENCES teams(team_id),
    starts_at       TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'scheduled',  -- 'scheduled' | 'completed'
    CHECK (home_team_id != away_team_id)
);

CREATE TABLE IF NOT EXISTS contracts (
    contract_id     TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    player_id       TEXT NOT NULL REFERENCES players(player_id),
    team_id         TEXT NOT NULL REFERENCES teams(team_id),
    position        TEXT NOT NULL,   -- 'forward' | 'defense' | 'goalie'
    jersey_number   INTEGER,
    start_season_id TEXT NOT NULL REFERENCES seasons(season_id),
    end_season_id   TEXT REFERENCES seasons(season_id),  -- NULL while open
    created_at      TEXT NOT NULL,
    CHECK (jersey_number IS NULL OR jersey_number BETWEEN 0 AND 99)
);

-- At most one open contract per player.
CREATE UNIQUE INDEX IF NOT EXISTS contracts_one_open_idx
    ON contracts(organization_id, player_id) WHERE end_season_id IS NULL;
CREATE INDEX IF NOT EXISTS contracts_player_idx ON contracts(organization_id, player_id);
CREATE INDEX IF NOT EXISTS contracts_team_idx   ON contracts(organization_id, team_id);

CREATE TABLE IF NOT EXISTS suspensions (
    suspension_id   TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    player_id       TEXT NOT NULL REFERENCES players(player_id),
    team_id         TEXT NOT NULL REFERENCES teams(team_id),
    suspension_type TEXT NOT NULL,
    suspended_games INTEGER NOT NULL,
    served_games    INTEGER NOT NULL DEFAULT 0,
    reason          TEXT,
    game_event_id   TEXT,            -- triggering infraction, NULL if standalone
    game_id         TEXT REFERENCES games(game_id),
    created_at      TEXT NOT NULL,
    CHECK (suspended_games >= 1),
    CHECK (served_games >= 0 AND served_games <= suspended_games)
);

CREATE INDEX IF NOT EXISTS suspensions_player_idx ON suspensions(organization_id, player_id);
CREATE INDEX IF NOT EXISTS suspensions_team_idx   ON suspensions(organization_id, team_id);
CREATE INDEX IF NOT EXISTS suspensions_game_idx   ON suspensions(organization_id, game_id);

-- One row per game credited to a suspension; the primary key is what makes
-- replayed game completions no-ops.
CREATE TABLE IF NOT EXISTS suspension_service (
    suspension_id   TEXT NOT NULL REFERENCES suspensions(suspension_id) ON DELETE CASCADE,
    game_id         TEXT NOT NULL REFERENCES games(game_id),
    organization_id TEXT NOT NULL,
    credited_at     TEXT NOT NULL,
    PRIMARY KEY (suspension_id, game_id)
);

PRAGMA user_version = 1;
";
