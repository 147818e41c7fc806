pub mod return_form;
