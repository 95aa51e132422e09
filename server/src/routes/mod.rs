pub mod advice;
pub mod health;
pub mod pages;
pub mod predict;
pub mod register;
