use super::constants::LEVEL_SEPARATOR;

/// Turns a course or level name into its URL form. Letters are lowercased,
/// every run of other characters becomes a single `-`, and no `-` is left at
/// either end.
pub fn slugify(name: &str) -> String {
	let mut slug = String::with_capacity(name.len());
	let mut pending_separator = false;

	for ch in name.chars() {
		if ch.is_alphanumeric() {
			if pending_separator && !slug.is_empty() {
				slug.push('-');
			}
			pending_separator = false;
			slug.extend(ch.to_lowercase());
		} else {
			pending_separator = true;
		}
	}

	slug
}

/// The URL of a student's course page:
/// `/{prn}/{slugified-course-name}-level-{levelName}`
pub fn course_path(prn: &str, course_name: &str, level_name: &str) -> String {
	format!(
		"/{}/{}{}{}",
		prn,
		slugify(course_name),
		LEVEL_SEPARATOR,
		slugify(level_name)
	)
}

/// Splits the last path segment of a course URL into the course slug and the
/// level slug. The split happens on the last `-level-`, so course names that
/// themselves contain the word "level" still round trip.
pub fn parse_course_slug(segment: &str) -> Option<(&str, &str)> {
	let (course, level) = segment.rsplit_once(LEVEL_SEPARATOR)?;
	if course.is_empty() || level.is_empty() {
		return None;
	}
	Some((course, level))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn slugify_collapses_separators() {
		assert_eq!(slugify("Robotics & AI  Basics"), "robotics-ai-basics");
		assert_eq!(slugify("  --Drones-- "), "drones");
		assert_eq!(slugify("IoT 2.0"), "iot-2-0");
	}

	#[test]
	fn course_path_uses_level_separator() {
		assert_eq!(
			course_path("12345", "Robotics Basics", "Beginner"),
			"/12345/robotics-basics-level-beginner"
		);
	}

	#[test]
	fn parse_splits_on_last_separator() {
		assert_eq!(
			parse_course_slug("advanced-level-design-level-2"),
			Some(("advanced-level-design", "2"))
		);
		assert_eq!(parse_course_slug("robotics-basics"), None);
		assert_eq!(parse_course_slug("-level-2"), None);
	}
}
