

/// Schema round trips against a live database
mod db_tests;
