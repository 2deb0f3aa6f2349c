use super::dto::{WeeklyPlanInput, YogaPlanInput};

pub(crate) fn analyze_food() -> String {
    r#"You are a nutrition expert. Look at the attached meal (a photo, or a typed description of what was eaten).
Identify the ingredients, estimate calories, carbohydrates, protein and fat, and give the dish a short descriptive name.
State the estimates in the form "Calories: <n>, Protein: <n>g, Carbs: <n>g, Fat: <n>g"; ranges such as 300-400 are fine.

Reply with a single JSON object:
{"dishName": string, "ingredients": [string], "nutritionalInformation": string}"#
        .to_string()
}

pub(crate) fn weekly_plan(input: &WeeklyPlanInput) -> String {
    format!(
        r#"You are a nutritionist. Build a 7-day meal plan for this person using common foods available where they live.
Keep the meals simple and healthy, and aim for their daily calorie target.

- Goal: {goal}
- Location: {state}, {country}
- Health conditions: {disorders}
- Daily calorie target: ~{calories} kcal

Reply with a single JSON object holding exactly 7 days, Monday to Sunday:
{{"weeklyPlan": [{{"day": string, "meals": {{"breakfast": string, "lunch": string, "dinner": string}}}}]}}"#,
        goal = input.goal,
        state = input.state,
        country = input.country,
        disorders = input.disorders,
        calories = input.daily_calorie_goal,
    )
}

pub(crate) fn yoga_plan(input: &YogaPlanInput) -> String {
    format!(
        r#"You are a yoga and meditation instructor. Build a 7-day practice with a clear focus each day,
a sequence of asanas with hold times suited to the experience level, and a short meditation.

- Goal: {goal}
- Experience level: {level}

Reply with a single JSON object holding exactly 7 days, Monday to Sunday:
{{"yogaPlan": [{{"day": string, "focus": string, "asanas": [{{"name": string, "duration": string}}], "meditation": {{"type": string, "duration": string}}}}]}}"#,
        goal = input.goal,
        level = input.experience_level,
    )
}
