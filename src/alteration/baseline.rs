//! Baseline schema. Every statement is idempotent so it can run on each start.

pub const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS organization_scopes (
        seq BIGSERIAL NOT NULL UNIQUE,
        id VARCHAR(32) NOT NULL PRIMARY KEY,
        name VARCHAR(128) NOT NULL UNIQUE,
        description VARCHAR(256),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS organization_roles (
        seq BIGSERIAL NOT NULL UNIQUE,
        id VARCHAR(32) NOT NULL PRIMARY KEY,
        name VARCHAR(128) NOT NULL UNIQUE,
        description VARCHAR(256),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"DO $$ BEGIN
        CREATE TYPE passcode_type AS ENUM ('SignIn', 'Register', 'ForgotPassword');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$"#,
    r#"CREATE TABLE IF NOT EXISTS _alteration_state (
        singleton BOOLEAN NOT NULL PRIMARY KEY DEFAULT TRUE CHECK (singleton),
        timestamp BIGINT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"INSERT INTO _alteration_state (singleton, timestamp) VALUES (TRUE, 0)
        ON CONFLICT (singleton) DO NOTHING"#,
];
