pub mod lesson_card;
pub mod menu;
pub mod question;
pub mod result_card;
pub mod timer_bar;
