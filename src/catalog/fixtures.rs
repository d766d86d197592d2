use super::BookRecord;

/// The sample catalogue used to seed an in-memory source
pub fn sample_books() -> Vec<BookRecord> {
    vec![
        BookRecord::new("776-33-13328-46-3", "The Lord of The Rings", "Doris Lessing"),
        BookRecord::new("255-03-71788-05-4", "Game of Thrones I", "Ray Bradbury"),
        BookRecord::new("712-03-87188-05-4", "Bone of fire", "Willain Bradbury"),
        BookRecord::new("774-13-13326-60-1", "To Kill a Mockingbird", "Danielle Steel"),
        BookRecord::new("746-25-05830-50-7", "One Thousand and One Nights", "Ernest Hemingway"),
        BookRecord::new("572-70-62221-82-2", "Emma Story", "Henry James"),
        BookRecord::new("680-71-48243-17-0", "Alice Adventures in Wonderland", "Stephenie Meyer"),
        BookRecord::new("148-71-77362-42-3", "Game of Thrones II", "J. R. R. Tolkien"),
    ]
}

/// Titles of [`sample_books`] in catalogue order
pub fn sample_titles() -> Vec<String> {
    sample_books().into_iter().map(|b| b.title).collect()
}
