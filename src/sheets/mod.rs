pub mod spreadsheet_manager;
