//! LaTeX transpiler tests, one file per back end.

mod omml;
mod unicode;
