// Start of file: /src/models/mod.rs

/*
    * Data models shared across the API: tenant records and their
    * connection parameters.
*/

pub mod tenant;

// End of file: /src/models/mod.rs
