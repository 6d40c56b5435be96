use super::AlterationScript;

/// Every known alteration, oldest first. Timestamps must strictly increase.
pub static ALL: &[AlterationScript] = &[AlterationScript {
    version: "1.0.0_beta.14-1667900481-add-passcode-type-continue",
    up: &["ALTER TYPE passcode_type ADD VALUE 'Continue'"],
    // Drops the whole type instead of the single added value. Any column still
    // typed `passcode_type` makes this fail, and rows using 'Continue' have no
    // mapping back. Kept as shipped.
    down: &[
        "DROP TYPE passcode_type",
        "CREATE TYPE passcode_type AS ENUM ('SignIn', 'Register', 'ForgotPassword')",
    ],
}];
