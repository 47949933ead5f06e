//! # iscconf
//!
//! Reads ISC-style configuration text (dhcpd.conf, named.conf and DNS zone files) into a
//! mutable tree, and writes that tree back out as configuration the daemons accept.
//!
//! File Layout
//!
//! Everything lives under the [isc] namespace, split by pipeline stage:
//! src/isc
//!   ├── lexing       text -> tokens (one generic scanner, one pattern table per dialect)
//!   ├── classify     token -> (key, value, parameters)
//!   ├── building     tokens -> generic tree
//!   ├── formats      tree -> text
//!   ├── sorting      tree -> sorted copy
//!   └── dhcpd, zone  typed object models built straight from tokens
//!
//! The generic tree is shared by every brace dialect. The typed models trade that generality
//! for one struct per statement kind.

pub mod isc;
