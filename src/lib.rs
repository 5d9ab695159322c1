//! # API Server Toolbox - REST API Server
//!
//! A small JSON API over a handful of tables (notes, exams, users and
//! courses), plus a login check and a public file drop. Built with
//! [Axum](https://crates.io/crates/axum) for async HTTP handling,
//! [sqlx](https://crates.io/crates/sqlx) for PostgreSQL access and
//! [utoipa](https://crates.io/crates/utoipa) for OpenAPI documentation.
//!
//! ## Key Features
//!
//! - **Two Database Connections**: Notes live on their own connection; exams,
//!   users and courses share the default one. The binding is configurable.
//!
//! - **API Key Allow-List**: `GET /users` requires a `key` header matching a
//!   line of a flat key file loaded at startup.
//!
//! - **Uniform Formatting**: Absent results answer `204 No Content`; JSON is
//!   pretty-printed in development and compact otherwise.
//!
//! - **File Transfer**: Raw-body uploads into a public directory and
//!   attachment downloads back out of it.
//!
//! - **In-Memory Backend**: The same routes run against fixture data for
//!   tests and demos without a database.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, response formatting and router configuration |
//! | [`auth`] | API key allow-list and login check |
//! | [`config`] | TOML configuration with environment overrides |
//! | [`db`] | PostgreSQL pools, migrations and repositories |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`files`] | Public directory for uploads and downloads |
//! | [`memory`] | In-memory repositories backed by fixtures |
//! | [`models`] | Entities, request bodies and validation |
//! | [`repository`] | Storage traits shared by both backends |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! ### Notes
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/notes` | List all notes |
//! | GET | `/notes/{id}` | Get a note |
//! | POST | `/notes` | Create a note |
//! | PUT | `/notes/{id}` | Update a note |
//! | DELETE | `/notes/{id}` | Delete a note |
//!
//! ### Exams
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/exams` | List all exams |
//! | GET | `/exams/{id}` | Get an exam |
//! | GET | `/exams/paginate/{limit}/{offset}` | Window of exams |
//! | GET | `/exams/last_twenty` | Twenty most recently updated (summary) |
//! | GET | `/exams/last_twenty_by_sql` | Same, through literal SQL |
//! | GET | `/exams/last` | Exam with the highest id |
//! | GET | `/exams-count` | Number of exams |
//!
//! ### Other
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Service banner |
//! | GET | `/users` | List users (requires `key` header) |
//! | GET | `/courses` | List courses |
//! | POST | `/login` | Check credentials |
//! | PUT | `/upload/{filename}` | Store the request body as a file |
//! | GET | `/download/{filename}` | Download a stored file |
//!
//! ## Example Usage
//!
//! ```bash
//! # Development mode with the in-memory backend
//! STORAGE_BACKEND=memory cargo run
//!
//! # Against PostgreSQL
//! DEFAULT_DATABASE_URL=postgres://localhost/toolbox \
//! NOTES_DATABASE_URL=postgres://localhost/toolbox_notes cargo run
//!
//! # Create a note
//! curl -X POST http://localhost:9393/notes \
//!   -d '{ "title":"prova", "body":"corpo del messaggio di prova!" }'
//!
//! # List users
//! curl -H "key: c39547b2-dfcc-4c24-a867-55f26e1ca772" http://localhost:9393/users
//!
//! # Upload and download a file
//! curl -X PUT --data-binary @test.txt http://localhost:9393/upload/test.txt
//! curl -OJ http://localhost:9393/download/test.txt
//! ```
//!
//! ## Swagger UI
//!
//! ```text
//! http://localhost:9393/swagger-ui/
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod memory;
pub mod models;
pub mod repository;
pub mod state;
