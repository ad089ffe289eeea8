//! Rule string fixtures and parse/serialize tests.

mod round_trip;
