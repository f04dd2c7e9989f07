//! Token-authenticated social connection service.
//!
//! The crate is laid out hexagonally: `domain` holds the transport-agnostic
//! model, ports, and services; `inbound` exposes the HTTP adapter;
//! `outbound` implements the driven ports; `middleware` carries the session
//! and refresh guards; `server` wires everything from settings.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
